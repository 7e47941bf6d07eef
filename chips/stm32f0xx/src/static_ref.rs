// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Handle type for memory that lives at a fixed address.

use core::ops::Deref;

/// A pointer to statically placed memory, such as a block of memory mapped
/// I/O registers.
///
/// Nothing is allocated or freed through a `StaticRef`: it only names an
/// address and hands out `&'static T` when dereferenced. The memory behind
/// it belongs to the hardware.
#[derive(Debug)]
pub struct StaticRef<T> {
    ptr: *const T,
}

impl<T> StaticRef<T> {
    /// Create a new `StaticRef` from a raw pointer.
    ///
    /// ## Safety
    ///
    /// `ptr` must be aligned for `T` and point to memory that stays valid
    /// for reads (and, for interior-mutable `T`, writes) for as long as any
    /// dereference of the returned handle is live. For peripheral registers
    /// that also means the peripheral clock must be enabled before access.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef { ptr }
    }

    /// The address this handle points at.
    pub const fn as_ptr(&self) -> *const T {
        self.ptr
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T: 'static> Deref for StaticRef<T> {
    type Target = T;
    fn deref(&self) -> &'static T {
        // Validity of `ptr` was promised by the caller of `new`.
        unsafe { &*self.ptr }
    }
}
