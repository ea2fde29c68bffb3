//! # Resource Provisioner
//!
//! Lazily creates the app package and activity a work item needs. Both
//! operations check for the resource first and leave an existing one untouched,
//! so they are safe to run before every submission.
//!
//! Package creation is a four step sequence (upload target, bundle download,
//! bundle upload, descriptor POST). A failure part way through is reported but
//! nothing already done is rolled back.

use tracing::{debug, info, instrument};

use crate::api_clients::DesignAutomationClient;
use crate::config::PackageConfig;
use crate::error::{AutomationError, AutomationResult};
use crate::models::{Activity, AppPackage};

/// What an ensure call had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyPresent,
    Created,
}

#[derive(Debug)]
pub struct ResourceProvisioner<'a> {
    client: &'a DesignAutomationClient,
    package: &'a PackageConfig,
}

impl<'a> ResourceProvisioner<'a> {
    pub fn new(client: &'a DesignAutomationClient, package: &'a PackageConfig) -> Self {
        Self { client, package }
    }

    /// Ensure the app package `name` exists, creating it from the bundle at
    /// `bundle_source_url` when absent
    #[instrument(skip(self, bundle_source_url))]
    pub async fn ensure_package(
        &self,
        name: &str,
        bundle_source_url: &str,
    ) -> AutomationResult<ProvisionOutcome> {
        if self.client.package_exists(name).await? {
            debug!(package = %name, "App package already present");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        if bundle_source_url.is_empty() {
            return Err(AutomationError::invalid_input(format!(
                "package '{name}' does not exist and no bundle source url is configured"
            )));
        }

        let upload_url = self.client.package_upload_url().await?;
        debug!(package = %name, "Obtained package upload target");

        let transport = self.client.transport();
        let bundle = transport
            .download(bundle_source_url, "download package bundle")
            .await?;
        debug!(package = %name, bytes = bundle.len(), "Downloaded package bundle");

        transport
            .upload(&upload_url, bundle, "upload package bundle")
            .await?;

        let descriptor = AppPackage::new(
            name,
            self.package.required_engine_version.as_str(),
            upload_url,
        );
        self.client.create_package(&descriptor).await?;

        info!(package = %name, "Provisioned app package");
        Ok(ProvisionOutcome::Created)
    }

    /// Ensure the activity `name` exists, creating it with the given packages
    /// and script when absent
    #[instrument(skip(self, script))]
    pub async fn ensure_activity(
        &self,
        name: &str,
        package_names: Vec<String>,
        script: &str,
    ) -> AutomationResult<ProvisionOutcome> {
        if self.client.activity_exists(name).await? {
            debug!(activity = %name, "Activity already present");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        let descriptor = Activity::new(
            name,
            package_names,
            script,
            self.package.required_engine_version.as_str(),
        );
        self.client.create_activity(&descriptor).await?;

        info!(activity = %name, "Provisioned activity");
        Ok(ProvisionOutcome::Created)
    }

    /// Packages every activity references: the owned package plus the shared
    /// reference package
    pub fn activity_packages(&self) -> Vec<String> {
        vec![
            self.package.name.clone(),
            self.package.reference_package.clone(),
        ]
    }

    /// Ensure the configured package, then the activity on top of it
    pub async fn ensure_all(&self, activity: &str, script: &str) -> AutomationResult<()> {
        self.ensure_package(&self.package.name, &self.package.source_url)
            .await?;
        self.ensure_activity(activity, self.activity_packages(), script)
            .await?;
        Ok(())
    }

    pub async fn delete_package(&self, name: &str) -> AutomationResult<()> {
        self.client.delete_package(name).await
    }

    pub async fn delete_activity(&self, name: &str) -> AutomationResult<()> {
        self.client.delete_activity(name).await
    }
}
