#![no_main]

use libfuzzer_sys::fuzz_target;
use typecycle::rotator::{PhraseList, Rotator, Timing};

// Input: NUL-separated phrases. Ticks through two full cycles checking that
// every emitted text is a prefix of the current phrase.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(phrases) = PhraseList::new(text.split('\0').take(16)) else {
        return;
    };

    let mut rotator = Rotator::new(phrases.clone(), Timing::default());
    while rotator.cycles() < 2 {
        let tick = rotator.tick();
        let index = tick.phrase_index;
        if let Some(shown) = tick.text {
            assert!(phrases.get(index).starts_with(shown));
        }
        assert!(rotator.state().visible_len() <= phrases.char_len(index));
    }
});
