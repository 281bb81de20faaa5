// A poisoned lock means some thread panicked while mutating the counter, so the pairing
// between the counter and the signaled state can no longer be trusted (we panic).
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - continued execution \
    is not safe because the counter and the signaled state may have diverged";
