#![no_main]

use libfuzzer_sys::fuzz_target;
use tunti::game::check_invariants;
use tunti::snapshot::{decode, encode};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok((state, updated_at)) = decode(text) else {
        return;
    };

    // Anything the decoder accepts is a legal position.
    assert!(check_invariants(&state).is_empty());

    // It must also survive a second trip unchanged.
    let encoded = encode(&state, updated_at).expect("decoded state must encode");
    let (again, stamp) = decode(&encoded).expect("encoded state must decode");
    assert_eq!(again, state);
    assert_eq!(stamp, updated_at);
});
