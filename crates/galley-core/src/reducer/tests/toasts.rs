use super::*;
use crate::model::ActivityKind;
use crate::state::MAX_TOASTS;
use pretty_assertions::assert_eq;

fn toast(state: &mut AppState, text: &str) {
    run_runtime(
        state,
        RuntimeAction::PushToast {
            level: ToastLevel::Info,
            text: text.to_string(),
        },
    );
}

#[test]
fn toasts_expire_after_their_ttl() {
    let mut state = state();
    toast(&mut state, "copied");
    let expires_at = state.toasts[0].expires_at_ms;

    let effects = run_runtime(
        &mut state,
        RuntimeAction::ExpireToasts {
            now_ms: expires_at - 1,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.toasts.len(), 1);

    let effects = run_runtime(&mut state, RuntimeAction::ExpireToasts { now_ms: expires_at });
    assert_eq!(effects, vec![GalleyEffect::RequestFrame]);
    assert!(state.toasts.is_empty());
}

#[test]
fn only_the_newest_toasts_are_kept() {
    let mut state = state();
    for idx in 0..(MAX_TOASTS + 3) {
        toast(&mut state, &format!("toast {idx}"));
    }
    let texts: Vec<&str> = state.toasts.iter().map(|toast| toast.text.as_str()).collect();
    assert_eq!(texts, vec!["toast 3", "toast 4", "toast 5", "toast 6"]);

    let ids: Vec<u64> = state.toasts.iter().map(|toast| toast.id).collect();
    let mut sorted = ids.clone();
    sorted.dedup();
    assert_eq!(ids, sorted);
}

#[test]
fn appended_activity_is_recorded_in_order() {
    let mut state = state();
    for message in ["first", "second"] {
        run_runtime(
            &mut state,
            RuntimeAction::AppendActivity {
                kind: ActivityKind::System,
                message: message.to_string(),
            },
        );
    }
    let messages: Vec<&str> = state
        .activity
        .iter()
        .map(|item| item.message.as_str())
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn open_in_ide_is_a_stub_effect() {
    let mut state = state();
    let effects = run_user(
        &mut state,
        UserAction::OpenInIde {
            file: "src/lib.rs".to_string(),
        },
    );
    assert!(has_effect(
        &effects,
        &GalleyEffect::OpenInIde {
            file: "src/lib.rs".to_string(),
        }
    ));
}
