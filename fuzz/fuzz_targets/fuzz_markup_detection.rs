#![no_main]

use libfuzzer_sys::fuzz_target;
use popup_core::is_markup;
use popup_dom::{Dom, MemoryDom};

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    let markup = is_markup(body);
    if !body.contains('<') {
        assert!(!markup);
    }

    // Whatever the classification, parsing into a document must not panic
    // and plain text must survive as text.
    let mut dom = MemoryDom::new();
    let nodes = dom.create_fragment(body);
    if !markup {
        assert!(nodes.iter().all(|n| dom.tag(*n).is_none()));
    }
});
