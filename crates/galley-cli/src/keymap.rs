use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use galley_core::state::KeymapPreset;

/// Chords that open the command palette from anywhere. `/` also works while
/// the composer is not focused.
pub fn opens_palette(preset: KeymapPreset, key: &KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('k') if ctrl => true,
        // Option+K, for terminals that send Option as Meta
        KeyCode::Char('k') if alt => preset == KeymapPreset::Mac,
        KeyCode::Char('p') if ctrl => preset == KeymapPreset::Windows,
        _ => false,
    }
}

pub fn palette_hint(preset: KeymapPreset) -> &'static str {
    match preset {
        KeymapPreset::Standard => "Ctrl+K",
        KeymapPreset::Mac => "⌥K",
        KeymapPreset::Windows => "Ctrl+P",
    }
}

pub fn help_rows(preset: KeymapPreset) -> Vec<(String, &'static str)> {
    let mut rows = vec![
        (format!("{} or /", palette_hint(preset)), "Command palette"),
        ("Tab / Shift+Tab".to_string(), "Next / previous tab"),
        ("1-9, 0".to_string(), "Jump to a tab"),
        ("↑ ↓  j k".to_string(), "Move the selection"),
        ("Enter".to_string(), "Open or toggle the selection"),
        ("i".to_string(), "Type in the composer (Esc leaves it)"),
        ("c".to_string(), "Quick cook"),
        ("m".to_string(), "Switch simple / advanced mode"),
        ("t".to_string(), "Next theme"),
        ("a".to_string(), "Show or hide the activity rail"),
        ("?".to_string(), "This help"),
        ("q".to_string(), "Quit"),
    ];
    rows.extend(
        [
            ("Plans", "← → move  Space pick up / drop  e export"),
            ("Plan detail", "Enter toggle  s save  d discard  o open file  Esc back"),
            ("Sessions", "n new  s start  p pause  r resume  x stop"),
            ("Brainstorm", "n new idea  r advance  p promote  Del remove"),
            ("Chat", "y copy  p next provider  o open file"),
            ("Cook / Fix", "x stop  R reset  o interactive questions"),
        ]
        .into_iter()
        .map(|(screen, keys)| (screen.to_string(), keys)),
    );
    rows
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_k_opens_the_palette_everywhere() {
        for preset in [
            KeymapPreset::Standard,
            KeymapPreset::Mac,
            KeymapPreset::Windows,
        ] {
            assert!(opens_palette(
                preset,
                &key(KeyCode::Char('k'), KeyModifiers::CONTROL)
            ));
        }
    }

    #[test]
    fn preset_specific_chords() {
        let option_k = key(KeyCode::Char('k'), KeyModifiers::ALT);
        let ctrl_p = key(KeyCode::Char('p'), KeyModifiers::CONTROL);
        assert!(opens_palette(KeymapPreset::Mac, &option_k));
        assert!(!opens_palette(KeymapPreset::Standard, &option_k));
        assert!(opens_palette(KeymapPreset::Windows, &ctrl_p));
        assert!(!opens_palette(KeymapPreset::Mac, &ctrl_p));
        assert!(!opens_palette(
            KeymapPreset::Standard,
            &key(KeyCode::Char('k'), KeyModifiers::NONE)
        ));
    }

    #[test]
    fn help_leads_with_the_palette_chord() {
        let rows = help_rows(KeymapPreset::Windows);
        assert_eq!(rows[0].0, "Ctrl+P or /");
    }
}
