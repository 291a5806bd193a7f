#![no_main]

use libfuzzer_sys::fuzz_target;
use rastreador::catalog::SyscallCatalog;

fuzz_target!(|data: &[u8]| {
    let catalog = SyscallCatalog::parse_bytes(data);
    for n in -1..4 {
        let _ = catalog.name_of(n);
        let _ = catalog.description_of(n);
    }
});
