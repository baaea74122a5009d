//! Example client: a singly-linked stack built entirely out of the public
//! `allocate`/`release` API, grounded on `examples/original_source/Stack.c`.
//!
//! The original represents a stack as `Node**` (a heap cell holding the head
//! pointer, so the handle itself survives across translation units). In
//! Rust the owning `Stack` struct plays that role directly; its `head`
//! field is exactly the original's dereferenced handle cell. Node shape and
//! traversal are otherwise a direct translation of `insert`/`pop`/`getElement`.

use core::cell::Cell;
use core::ptr::NonNull;

use crate::error::Error;

struct Node {
    data: i64,
    next: Cell<Option<NonNull<Node>>>,
}

/// A stack of `i64` values, each node individually allocated through the
/// crate's `allocate`/`release` entry points.
pub struct Stack {
    head: Option<NonNull<Node>>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { head: None }
    }

    /// Pushes `data` onto the stack. Mirrors `Stack.c`'s `insert`.
    pub fn push(&mut self, data: i64) -> Result<(), Error> {
        let ptr = crate::allocate(core::mem::size_of::<Node>()).ok_or(Error::OutOfMemory)?;
        let node_ptr = ptr.cast::<Node>();
        // SAFETY: `ptr` was just allocated with room for exactly one `Node`
        // and is not aliased anywhere else yet.
        unsafe {
            node_ptr.as_ptr().write(Node { data, next: Cell::new(self.head) });
        }
        self.head = Some(node_ptr);
        Ok(())
    }

    /// Removes and returns the top value, or `None` if the stack is empty.
    /// Mirrors `Stack.c`'s `pop` (which returns `-1` on empty; the `Option`
    /// here is the idiomatic equivalent since payloads are `i64`, not an
    /// unsigned type that would make `-1` ambiguous with a real value).
    pub fn pop(&mut self) -> Option<i64> {
        let node_ptr = self.head?;
        // SAFETY: `node_ptr` is a live node owned by this stack.
        let node = unsafe { node_ptr.as_ptr().read() };
        self.head = node.next.get();
        let _ = crate::release(node_ptr.cast());
        Some(node.data)
    }

    /// Returns the value `index` positions from the top, or `None` if
    /// `index` is out of range. Mirrors `Stack.c`'s `getElement`.
    pub fn get(&self, index: usize) -> Option<i64> {
        let mut cur = self.head;
        for _ in 0..index {
            // SAFETY: nodes on this chain are live as long as `self` is.
            cur = cur.and_then(|p| unsafe { p.as_ref() }.next.get());
        }
        // SAFETY: see above.
        cur.map(|p| unsafe { p.as_ref() }.data)
    }

    /// Number of elements currently on the stack. Supplements `Stack.c`'s
    /// debug-only `printStack`, which performs the same full traversal.
    pub fn len(&self) -> usize {
        let mut n = 0;
        let mut cur = self.head;
        while let Some(p) = cur {
            n += 1;
            // SAFETY: see `get`.
            cur = unsafe { p.as_ref() }.next.get();
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl Drop for Stack {
    /// Mirrors `Stack.c`'s `destroyStack`: releases every node.
    fn drop(&mut self) {
        while self.pop().is_some() {}
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
