// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ainspect::classifier::{predict, softmax};
use ainspect::history::parse_records;

#[derive(Arbitrary, Debug)]
enum Input<'a> {
    History(&'a [u8]),
    Scores(Vec<f32>),
}

fuzz_target!(|input: Input<'_>| {
    match input {
        Input::History(bytes) => {
            for record in parse_records(bytes) {
                let json = serde_json::to_vec(&record).expect("records serialize");
                let _ = parse_records(&[&b"["[..], json.as_slice(), &b"]"[..]].concat());
            }
        }
        Input::Scores(scores) => {
            if let Ok(prediction) = predict(&scores) {
                assert!((0.0..=1.0).contains(&prediction.probability));
            }
            let _ = softmax(&scores);
        }
    }
});
