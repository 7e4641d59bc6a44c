// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        if let Ok(manifest) = fleetmap::manifest::parse_go_mod(source) {
            let libs = manifest.effective_requires();
            assert_eq!(libs.len(), manifest.requires.len());
        }
    }
});
