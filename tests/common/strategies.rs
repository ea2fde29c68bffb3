use proptest::prelude::*;

/// Drawing file names as browsers send them, including spaces and symbols
pub fn drawing_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _+()#&%-]{1,40}\\.dwg"
}

/// Object keys made of non-empty path segments
pub fn object_key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9 _.+=,;@$!()'~-]{1,20}", 1..5)
        .prop_map(|segments| segments.join("/"))
}

/// Archive entry paths using either separator
pub fn entry_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(("[a-zA-Z0-9_.]{1,12}", prop::bool::ANY), 1..5).prop_map(|parts| {
        let mut path = String::new();
        for (i, (segment, backslash)) in parts.iter().enumerate() {
            if i > 0 {
                path.push(if *backslash { '\\' } else { '/' });
            }
            path.push_str(segment);
        }
        path
    })
}
