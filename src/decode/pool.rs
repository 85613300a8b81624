use std::cell::RefCell;

use crate::arena::ArenaParts;

/// One spare table set per thread, reused by eager parses that have no
/// [`Allocator`](crate::Allocator).
#[derive(Default)]
struct ArenaPool {
    parts: Option<ArenaParts>,
}

impl ArenaPool {
    fn take(&mut self) -> ArenaParts {
        self.parts.take().unwrap_or_default()
    }

    fn put(&mut self, mut parts: ArenaParts) {
        parts.clear();
        self.parts = Some(parts);
    }
}

thread_local! {
    static ARENA_POOL: RefCell<ArenaPool> = RefCell::new(ArenaPool::default());
}

pub(crate) fn take_arena_parts() -> ArenaParts {
    ARENA_POOL.with(|pool| pool.borrow_mut().take())
}

pub(crate) fn put_arena_parts(parts: ArenaParts) {
    ARENA_POOL.with(|pool| pool.borrow_mut().put(parts));
}
