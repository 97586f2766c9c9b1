use super::*;
use pretty_assertions::assert_eq;

#[test]
fn empty_query_returns_every_item_in_order() {
    let expected: Vec<usize> = (0..PALETTE_ITEMS.len()).collect();
    assert_eq!(filtered_palette_indices(""), expected);
    assert_eq!(filtered_palette_indices("   "), expected);
}

#[test]
fn query_matches_label_or_category_ignoring_case() {
    let expected: Vec<usize> = PALETTE_ITEMS
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.label.to_lowercase().contains("cook")
                || item.category.to_lowercase().contains("cook")
        })
        .map(|(idx, _)| idx)
        .collect();

    let found = filtered_palette_indices("CoOk");
    assert_eq!(found, expected);
    assert!(found.iter().any(|idx| PALETTE_ITEMS[*idx].label == "Quick cook"));
    // "Open the wizard" only matches through its category
    assert!(found.iter().any(|idx| PALETTE_ITEMS[*idx].label == "Open the wizard"));
}

#[test]
fn query_without_matches_is_empty() {
    assert!(filtered_palette_indices("zzzz").is_empty());
}

#[test]
fn palette_navigation_wraps_and_typing_resets_selection() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleCommandPalette);

    run_user(&mut state, UserAction::OverlayMoveUp);
    assert_eq!(
        state.interaction.overlay,
        Overlay::CommandPalette {
            selected: PALETTE_ITEMS.len() - 1,
            query: String::new(),
        }
    );
    run_user(&mut state, UserAction::OverlayMoveDown);
    assert!(matches!(
        state.interaction.overlay,
        Overlay::CommandPalette { selected: 0, .. }
    ));

    run_user(&mut state, UserAction::OverlayMoveDown);
    run_user(&mut state, UserAction::OverlayQueryInput('t'));
    assert_eq!(
        state.interaction.overlay,
        Overlay::CommandPalette {
            selected: 0,
            query: "t".to_string(),
        }
    );
}

#[test]
fn submit_runs_the_filtered_command_and_closes() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleCommandPalette);
    run_user(&mut state, UserAction::OverlayQueryPaste("go to plans".to_string()));

    let effects = run_user(&mut state, UserAction::OverlaySubmit);
    assert_eq!(state.interaction.overlay, Overlay::None);
    assert_eq!(state.nav.tab, Tab::Plans);
    assert!(has_effect(&effects, &GalleyEffect::RequestFrame));
}

#[test]
fn quick_cook_item_replaces_the_palette_with_its_overlay() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleCommandPalette);
    run_user(&mut state, UserAction::OverlayQueryPaste("quick".to_string()));
    run_user(&mut state, UserAction::OverlaySubmit);

    assert_eq!(
        state.interaction.overlay,
        Overlay::QuickCook {
            input: String::new(),
            error: None,
        }
    );
}

#[test]
fn submit_with_no_match_keeps_the_palette_open() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleCommandPalette);
    run_user(&mut state, UserAction::OverlayQueryPaste("zzzz".to_string()));

    let effects = run_user(&mut state, UserAction::OverlaySubmit);
    assert!(effects.is_empty());
    assert!(matches!(
        state.interaction.overlay,
        Overlay::CommandPalette { .. }
    ));
}

#[test]
fn quit_item_emits_quit() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleCommandPalette);
    run_user(&mut state, UserAction::OverlayQueryPaste("quit".to_string()));
    let effects = run_user(&mut state, UserAction::OverlaySubmit);
    assert!(has_effect(&effects, &GalleyEffect::Quit));
}
