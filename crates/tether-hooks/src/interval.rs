use std::cell::RefCell;
use std::rc::Rc;

use tether_core::*;
use web_time::Duration;

/// Calls `tick` every `period` while mounted. Changing `period` restarts the
/// timer; the latest `tick` is always the one called.
pub fn use_interval(period: Duration, tick: Rc<dyn Fn()>) {
    let latest = remember(|| RefCell::new(tick.clone()));
    *latest.borrow_mut() = tick;
    let platform = platform();

    disposable_effect(period, move || {
        let forward: Rc<dyn Fn()> = Rc::new(move || {
            let tick = latest.borrow().clone();
            tick();
        });
        let id = platform.set_interval(period, forward);
        on_unmount(move || platform.clear_interval(id))
    });
}
