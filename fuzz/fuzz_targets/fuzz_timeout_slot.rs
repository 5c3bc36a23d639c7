//! Fuzz target: `TimeoutStore::load`
//!
//! Arbitrary slot contents must always load as a plausible record, and a
//! second load must return the same record without rewriting.
//!
//! cargo fuzz run fuzz_timeout_slot

#![no_main]

use libfuzzer_sys::fuzz_target;
use shadectl::adapters::eeprom::EepromAdapter;
use shadectl::app::ports::StoragePort;
use shadectl::timeouts::{TimeoutRecord, TimeoutStore, RECORD_SLOT_LEN};

fuzz_target!(|data: &[u8]| {
    let mut eeprom = EepromAdapter::erased();
    let len = data.len().min(RECORD_SLOT_LEN);
    if eeprom.store(0, &data[..len]).is_err() {
        return;
    }
    let _ = eeprom.commit();

    let store = TimeoutStore::new(0);
    let first = store.load(&mut eeprom, TimeoutRecord::new(60, 60));
    assert!(first.is_plausible());

    let commits = eeprom.commit_count();
    let second = store.load(&mut eeprom, TimeoutRecord::new(1, 1));
    assert_eq!(first, second);
    assert_eq!(eeprom.commit_count(), commits);
});
