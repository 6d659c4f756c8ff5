// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use depcycles::dotfile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(graph) = dotfile::load_str(text) {
        // Whatever loads must survive a write/load round trip
        let reloaded = dotfile::load_str(&graph.to_dot("G")).unwrap();
        assert_eq!(reloaded.edge_count(), graph.edge_count());
    }
});
