/// A platform scancode, opaque to the engine. Translating raw keys into
/// logical keys is a keyboard-layout concern that lives outside the core; the
/// embedding injects a translator function (see
/// [`Screen::set_key_translator`](crate::Screen::set_key_translator)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawKey(pub u32);

/// A logical key press, after layout translation. Text entry is limited to
/// single code units; shaping and composition are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Escape,
}

/// A translator from raw platform keys to logical keys. Returning `None`
/// drops the key.
pub type KeyTranslator = dyn Fn(RawKey) -> Option<Key>;

/// The default translator, used when the embedding doesn't install one:
/// ASCII scancodes map to themselves, everything else is dropped.
pub fn ascii_translator(raw: RawKey) -> Option<Key> {
    match raw.0 {
        0x08 => Some(Key::Backspace),
        0x09 => Some(Key::Tab),
        0x0d => Some(Key::Enter),
        0x1b => Some(Key::Escape),
        0x7f => Some(Key::Delete),
        c if (0x20..0x7f).contains(&c) => char::from_u32(c).map(Key::Char),
        _ => None,
    }
}
