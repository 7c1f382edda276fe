#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use popup_core::{ChoiceMap, Choices};

#[derive(Debug, Arbitrary)]
enum Input {
    List(Vec<String>),
    Pairs(Vec<(String, String)>),
}

fuzz_target!(|input: Input| {
    match input {
        Input::List(items) => {
            let map = Choices::from(items.clone()).normalize();
            for item in &items {
                assert_eq!(map.label(item), Some(item.as_str()));
            }
            assert!(map.len() <= items.len());
            let mut seen = Vec::new();
            for item in items {
                if !seen.contains(&item) {
                    seen.push(item);
                }
            }
            assert!(map.keys().eq(seen.iter().map(String::as_str)));
        }
        Input::Pairs(pairs) => {
            let map: ChoiceMap = pairs.iter().cloned().collect();
            for (key, _) in &pairs {
                let last = pairs
                    .iter()
                    .rev()
                    .find(|(k, _)| k == key)
                    .map(|(_, l)| l.as_str());
                assert_eq!(map.label(key), last);
            }
            assert_eq!(Choices::Map(map.clone()).normalize(), map);
        }
    }
});
