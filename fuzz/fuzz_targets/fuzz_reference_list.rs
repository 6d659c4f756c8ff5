// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use depcycles::reference::ReferenceList;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(list) = ReferenceList::parse(text) {
            assert_eq!(list.sorted_by_level().len(), list.len());
        }
    }
});
