use std::path::Path;

use ctext_editor::document::Document;
use ctext_editor::mode::Mode;
use ctext_editor::persist::Persistence;
use ctext_editor::session::Session;
use ctext_editor::Result;
use ctext_term::input::{Event, KeyCode, KeyEvent, Modifiers, Wheel};
use proptest::prelude::*;

/// Accepts every write and stores nothing.
struct NullStore;

impl Persistence for NullStore {
    fn read_lines(&self, _: &Path, _: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn write_lines(&self, _: &Path, _: &[String]) -> Result<()> {
        Ok(())
    }
}

fn session(lines: Vec<String>) -> Session {
    Session::new(Document::new(lines, None), Box::new(NullStore), 4)
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just(String::new()),
            "[a-z .,_()]{0,20}",
            "[a-zé漢 ]{0,8}",
            "[ ]{0,6}",
        ],
        0..12,
    )
}

fn key_strategy() -> impl Strategy<Value = Event> {
    let code = prop_oneof![
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Home),
        Just(KeyCode::End),
        Just(KeyCode::Enter),
        Just(KeyCode::Tab),
        Just(KeyCode::Backspace),
        Just(KeyCode::Escape),
        prop::sample::select(vec!['i', 'a', 'R', 'v', 'h', 'j', 'k', 'l', 'x', ' ', '.', 'é']).prop_map(KeyCode::Char),
    ];
    let mods = prop_oneof![Just(Modifiers::empty()), Just(Modifiers::CTRL)];
    prop_oneof![
        8 => (code, mods).prop_map(|(c, m)| Event::Key(KeyEvent::new(c, m))),
        1 => prop_oneof![Just(Wheel::Up), Just(Wheel::Down)].prop_map(Event::Wheel),
    ]
}

fn assert_cursor_in_bounds(s: &Session) {
    let doc = s.document();
    let buf = doc.buffer();
    let pos = doc.pos();
    assert!(pos.line < buf.line_count(), "line {} of {}", pos.line, buf.line_count());
    let len = buf.line_len(pos.line).unwrap();
    assert!(pos.col <= s.mode().max_col(len), "col {} on len {len} in {:?}", pos.col, s.mode());
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(lines in lines_strategy(), keys in prop::collection::vec(key_strategy(), 0..60)) {
        let mut s = session(lines);
        assert_cursor_in_bounds(&s);
        for key in &keys {
            s.handle_event(key);
            assert_cursor_in_bounds(&s);
        }
    }

    #[test]
    fn normal_mode_never_rests_past_last_char(lines in lines_strategy(), keys in prop::collection::vec(key_strategy(), 0..40)) {
        let mut s = session(lines);
        for key in &keys {
            s.handle_event(key);
            if s.mode() == Mode::Normal {
                let doc = s.document();
                let len = doc.buffer().line_len(doc.pos().line).unwrap();
                prop_assert!(doc.pos().col < len.max(1));
            }
        }
    }

    #[test]
    fn return_then_backspace_restores(line in "[a-zé ]{0,16}", at in 0usize..20) {
        let mut s = session(vec![line.clone(), "tail".into()]);
        s.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Char('i'))));
        for _ in 0..at {
            s.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Right)));
        }
        let before = s.document().pos();
        s.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Enter)));
        s.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Backspace)));

        prop_assert_eq!(s.document().buffer().lines(), &[line, "tail".to_string()][..]);
        prop_assert_eq!(s.document().pos(), before);
    }

    #[test]
    fn backspace_at_origin_changes_nothing(lines in lines_strategy(), ctrl in any::<bool>()) {
        let mut s = session(lines);
        s.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Char('i'))));
        let before = s.document().buffer().clone();
        let mods = if ctrl { Modifiers::CTRL } else { Modifiers::empty() };
        s.handle_event(&Event::Key(KeyEvent::new(KeyCode::Backspace, mods)));
        prop_assert_eq!(s.document().buffer(), &before);
        prop_assert!(s.document().pos().is_zero());
    }
}
