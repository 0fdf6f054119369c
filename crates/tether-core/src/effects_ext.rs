use crate::{Dispose, after_commit, remember, scoped_effect};
use std::cell::RefCell;
use std::rc::Rc;

/// cleanup on key change or unmount
///
/// The effect runs after the frame is rendered, never during composition. When
/// `key` differs from the previous frame's key the previous cleanup runs
/// first, then the new effect; the last cleanup runs on unmount.
pub fn disposable_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    // Slot-based. For branch-stability use `remember_with_key` variants.
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup_slot: Rc<RefCell<Option<Dispose>>> = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| RefCell::new(false));

    // Install a single unmount disposer for this callsite.
    if !*installed.borrow() {
        *installed.borrow_mut() = true;
        let cleanup_slot = cleanup_slot.clone();
        scoped_effect(move || {
            Box::new(move || {
                let d = cleanup_slot.borrow_mut().take();
                if let Some(d) = d {
                    d.run();
                }
            })
        });
    }

    // Key change: cleanup previous + run new effect
    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        *last_key.borrow_mut() = Some(key);

        after_commit(move || {
            let previous = cleanup_slot.borrow_mut().take();
            if let Some(d) = previous {
                d.run();
            }
            let d = effect();
            *cleanup_slot.borrow_mut() = Some(d);
        });
    }
}

/// Runs once per mount, after the first frame; cleanup on unmount.
pub fn mount_effect(effect: impl FnOnce() -> Dispose + 'static) {
    disposable_effect((), effect)
}

/// runs after every frame
pub fn side_effect(effect: impl FnOnce() + 'static) {
    after_commit(effect);
}
