// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use fleetmap::classify::{derive_label, is_client_module_loose, is_client_module_strict};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str)| {
    let (path, prefix) = input;
    let _ = is_client_module_strict(path, prefix);
    let _ = is_client_module_loose(path, prefix);
    assert!(!derive_label(path).is_empty() || path.is_empty());
});
