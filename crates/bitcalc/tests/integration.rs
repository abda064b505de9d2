//! End-to-end tests: keys in, results and history out.

use bitcalc::{
    char_to_message, CalcMessage, Event, FixedWidthCalculator, HistoryConfig, HistoryStore,
    InMemoryHistory, Key, Mode, Screen, Store,
};

type CalcStore = Store<FixedWidthCalculator, InMemoryHistory>;

fn store(mode: Mode) -> CalcStore {
    Store::new(FixedWidthCalculator::new(mode), InMemoryHistory::new())
}

fn type_into(store: &mut CalcStore, keys: &str) {
    for c in keys.chars() {
        if let Some(msg) = char_to_message(c) {
            store.dispatch(msg).unwrap();
        }
    }
}

fn signed(store: &CalcStore) -> &str {
    &store.state().result().unwrap().signed_decimal
}

#[test]
fn test_wraparound_in_every_mode() {
    let cases = [
        (Mode::Word, "32767+1=", "-32768"),
        (Mode::Dword, "2147483647+1=", "-2147483648"),
        (Mode::Qword, "9223372036854775807+1=", "-9223372036854775808"),
    ];
    for (mode, keys, expected) in cases {
        let mut s = store(mode);
        type_into(&mut s, keys);
        assert_eq!(signed(&s), expected, "{mode}");
    }
}

#[test]
fn test_truncating_division() {
    let mut s = store(Mode::Word);
    type_into(&mut s, "7÷2=");
    assert_eq!(signed(&s), "3");
    type_into(&mut s, "-7÷2=");
    assert_eq!(signed(&s), "-3");
}

#[test]
fn test_divide_by_zero_emits_nothing() {
    let mut s = store(Mode::Word);
    type_into(&mut s, "5÷0");
    let created = s.dispatch(CalcMessage::Evaluate).unwrap();
    assert!(created.is_empty());
    assert!(s.history().is_empty());
    assert_eq!(s.state().expression().as_str(), "5÷0");
    assert_eq!(
        s.state().screen(),
        &Screen::Message("Cannot divide by zero".to_string())
    );
}

#[test]
fn test_shift_keys_via_key_messages() {
    let mut s = store(Mode::Word);
    for key in [Key::Num5, Key::Less, Key::Num3, Key::Equal] {
        s.dispatch(CalcMessage::Key(key)).unwrap();
    }
    assert_eq!(signed(&s), "40");
}

#[test]
fn test_overflow_keystroke_rejected() {
    let mut s = store(Mode::Word);
    type_into(&mut s, "327678");
    assert_eq!(s.state().expression().as_str(), "32767");
}

#[test]
fn test_word_ten_formats() {
    let mut s = store(Mode::Word);
    type_into(&mut s, "5+5=");
    let result = s.state().result().unwrap();
    assert_eq!(result.binary, "0b0000 0000 0000 1010");
    assert_eq!(result.hex, "0x000A");
}

#[test]
fn test_reinterpret_across_modes() {
    let mut s = store(Mode::Word);
    type_into(&mut s, "0-1=");
    let word = s.state().result().unwrap().clone();
    assert_eq!(word.signed_decimal, "-1");
    assert_eq!(word.hex, "0xFFFF");

    let dword = word.reinterpret(Mode::Dword);
    assert_eq!(dword.signed_decimal, "65535");
    assert_eq!(dword.hex, "0x0000 FFFF");
    assert_eq!(dword.unsigned(), word.unsigned());
}

#[test]
fn test_successful_evaluations_reach_history() {
    let mut s = store(Mode::Dword);
    type_into(&mut s, "6×7=");
    type_into(&mut s, "100-1=");

    let entries = s.history().list();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].record.formula, "100-1");
    assert_eq!(entries[0].record.result, "99");
    assert_eq!(entries[1].record.formula, "6×7");
    assert_eq!(entries[1].record.mode, Mode::Dword);
}

#[test]
fn test_history_limit_applies() {
    let history = InMemoryHistory::with_config(HistoryConfig { max_entries: 2 });
    let mut s = Store::new(FixedWidthCalculator::default(), history);
    for keys in ["1+1=", "2+2=", "3+3="] {
        type_into(&mut s, keys);
    }
    let results: Vec<_> = s
        .history()
        .list()
        .into_iter()
        .map(|e| e.record.result)
        .collect();
    assert_eq!(results, vec!["6", "4"]);
}

#[test]
fn test_mode_switch_resets_line() {
    let mut s = store(Mode::Qword);
    type_into(&mut s, "9999999999");
    s.dispatch(CalcMessage::SetMode(Mode::Word)).unwrap();
    assert!(s.state().expression().is_empty());
    type_into(&mut s, "1+1=");
    assert_eq!(s.state().result().unwrap().mode, Mode::Word);
}

#[test]
fn test_text_input_event_runs_through_store() {
    let mut s = store(Mode::Qword);
    let created = s
        .dispatch(CalcMessage::Input(Event::TextInput {
            text: "1<<40=".to_string(),
        }))
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].record.formula, "1<<40");
    assert_eq!(created[0].record.result, "256");
    assert!(matches!(s.state().screen(), Screen::Result(r) if r.signed_decimal == "256"));
}
