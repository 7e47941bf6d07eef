// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! General-purpose I/O register map for the STM32F0.
//!
//! Each port (A, B, C) is an independent instance of [`GpioRegisters`]
//! placed at a fixed address. Register access is a single volatile load or
//! store; which bits belong to which pin is described by the bitfields
//! below and applied by the caller.
//!
//! Two registers have a write protocol that the hardware enforces and this
//! module does not hide:
//!
//! - `set_reset` sets and clears `output` bits in one bus write. Bits 0..15
//!   set pins, bits 16..31 clear them. Keep it one write; splitting it into
//!   two stores opens a window where another context sees half the update.
//!   See [`set_and_clear`].
//! - `lock_cfg` only takes effect after the key sequence `LCKK` = 1, 0, 1
//!   (with the same `LCK` bits each time) followed by two reads, the second
//!   of which must return `LCKK` = 1. Nothing may touch `lock_cfg` between
//!   the steps. See [`lock_pins`].
//!
//! Neither procedure masks interrupts. Callers sharing a port with an
//! interrupt handler serialize access themselves.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::{register_bitfields, register_structs};

use crate::static_ref::StaticRef;

register_structs! {
    /// GPIO port registers (RM0091 section 8.4)
    pub GpioRegisters {
        /// Per-pin mode: input (reset default), output, alternate function,
        /// analog
        (0x000 => pub mode: ReadWrite<u32, MODE::Register>),
        /// Per-pin output type: push-pull (reset default) or open-drain
        (0x004 => pub out_mode: ReadWrite<u32, OUT_MODE::Register>),
        /// Per-pin output slew rate
        (0x008 => pub speed: ReadWrite<u32, SPEED::Register>),
        /// Per-pin pull-up/pull-down
        (0x00C => pub pull: ReadWrite<u32, PULL::Register>),
        /// Live input level of each pin
        (0x010 => pub input: ReadOnly<u32, INPUT::Register>),
        /// Output level driven by the CPU
        (0x014 => pub output: ReadWrite<u32, OUTPUT::Register>),
        /// Atomic set (low half) and clear (high half) of `output` bits
        (0x018 => pub set_reset: WriteOnly<u32, SET_RESET::Register>),
        /// Configuration lock; written only through the key sequence
        (0x01C => pub lock_cfg: ReadWrite<u32, LOCK_CFG::Register>),
        /// Alternate function select, pins 0..7 then pins 8..15
        (0x020 => pub alt_fn: [ReadWrite<u32, ALT_FN::Register>; 2]),
        /// Clear `output` bits. Overlaps the high half of `set_reset` in
        /// effect, but is a separate register and stays one.
        (0x028 => pub reset: WriteOnly<u32, RESET::Register>),
        (0x02C => @END),
    }
}

register_bitfields![u32,
    /// GPIO port mode register (GPIOx_MODER)
    pub MODE [
        MODER0 OFFSET(0) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER1 OFFSET(2) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER2 OFFSET(4) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER3 OFFSET(6) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER4 OFFSET(8) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER5 OFFSET(10) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER6 OFFSET(12) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER7 OFFSET(14) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER8 OFFSET(16) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER9 OFFSET(18) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER10 OFFSET(20) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER11 OFFSET(22) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER12 OFFSET(24) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER13 OFFSET(26) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER14 OFFSET(28) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ],
        MODER15 OFFSET(30) NUMBITS(2) [
            Input = 0,
            Output = 1,
            AlternateFunction = 2,
            Analog = 3
        ]
    ],
    /// GPIO port output type register (GPIOx_OTYPER)
    pub OUT_MODE [
        OT0 OFFSET(0) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT1 OFFSET(1) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT2 OFFSET(2) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT3 OFFSET(3) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT4 OFFSET(4) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT5 OFFSET(5) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT6 OFFSET(6) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT7 OFFSET(7) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT8 OFFSET(8) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT9 OFFSET(9) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT10 OFFSET(10) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT11 OFFSET(11) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT12 OFFSET(12) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT13 OFFSET(13) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT14 OFFSET(14) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ],
        OT15 OFFSET(15) NUMBITS(1) [
            PushPull = 0,
            OpenDrain = 1
        ]
    ],
    /// GPIO port output speed register (GPIOx_OSPEEDR)
    ///
    /// The encoding is `x0` low, `01` medium, `11` high, so both `0b00`
    /// (`Low`) and `0b10` (`LowAlt`) select low speed.
    pub SPEED [
        OSPEEDR0 OFFSET(0) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR1 OFFSET(2) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR2 OFFSET(4) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR3 OFFSET(6) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR4 OFFSET(8) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR5 OFFSET(10) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR6 OFFSET(12) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR7 OFFSET(14) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR8 OFFSET(16) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR9 OFFSET(18) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR10 OFFSET(20) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR11 OFFSET(22) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR12 OFFSET(24) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR13 OFFSET(26) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR14 OFFSET(28) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ],
        OSPEEDR15 OFFSET(30) NUMBITS(2) [
            Low = 0,
            Medium = 1,
            LowAlt = 2,
            High = 3
        ]
    ],
    /// GPIO port pull-up/pull-down register (GPIOx_PUPDR)
    pub PULL [
        PUPDR0 OFFSET(0) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR1 OFFSET(2) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR2 OFFSET(4) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR3 OFFSET(6) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR4 OFFSET(8) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR5 OFFSET(10) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR6 OFFSET(12) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR7 OFFSET(14) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR8 OFFSET(16) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR9 OFFSET(18) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR10 OFFSET(20) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR11 OFFSET(22) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR12 OFFSET(24) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR13 OFFSET(26) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR14 OFFSET(28) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ],
        PUPDR15 OFFSET(30) NUMBITS(2) [
            NoPull = 0,
            PullUp = 1,
            PullDown = 2
        ]
    ],
    /// GPIO port input data register (GPIOx_IDR)
    pub INPUT [
        IDR0 OFFSET(0) NUMBITS(1) [],
        IDR1 OFFSET(1) NUMBITS(1) [],
        IDR2 OFFSET(2) NUMBITS(1) [],
        IDR3 OFFSET(3) NUMBITS(1) [],
        IDR4 OFFSET(4) NUMBITS(1) [],
        IDR5 OFFSET(5) NUMBITS(1) [],
        IDR6 OFFSET(6) NUMBITS(1) [],
        IDR7 OFFSET(7) NUMBITS(1) [],
        IDR8 OFFSET(8) NUMBITS(1) [],
        IDR9 OFFSET(9) NUMBITS(1) [],
        IDR10 OFFSET(10) NUMBITS(1) [],
        IDR11 OFFSET(11) NUMBITS(1) [],
        IDR12 OFFSET(12) NUMBITS(1) [],
        IDR13 OFFSET(13) NUMBITS(1) [],
        IDR14 OFFSET(14) NUMBITS(1) [],
        IDR15 OFFSET(15) NUMBITS(1) []
    ],
    /// GPIO port output data register (GPIOx_ODR)
    pub OUTPUT [
        ODR0 OFFSET(0) NUMBITS(1) [],
        ODR1 OFFSET(1) NUMBITS(1) [],
        ODR2 OFFSET(2) NUMBITS(1) [],
        ODR3 OFFSET(3) NUMBITS(1) [],
        ODR4 OFFSET(4) NUMBITS(1) [],
        ODR5 OFFSET(5) NUMBITS(1) [],
        ODR6 OFFSET(6) NUMBITS(1) [],
        ODR7 OFFSET(7) NUMBITS(1) [],
        ODR8 OFFSET(8) NUMBITS(1) [],
        ODR9 OFFSET(9) NUMBITS(1) [],
        ODR10 OFFSET(10) NUMBITS(1) [],
        ODR11 OFFSET(11) NUMBITS(1) [],
        ODR12 OFFSET(12) NUMBITS(1) [],
        ODR13 OFFSET(13) NUMBITS(1) [],
        ODR14 OFFSET(14) NUMBITS(1) [],
        ODR15 OFFSET(15) NUMBITS(1) []
    ],
    /// GPIO port bit set/reset register (GPIOx_BSRR)
    pub SET_RESET [
        /// Set bits, one per pin
        BS OFFSET(0) NUMBITS(16) [],
        /// Reset bits, one per pin
        BR OFFSET(16) NUMBITS(16) [],
        BS0 OFFSET(0) NUMBITS(1) [],
        BS1 OFFSET(1) NUMBITS(1) [],
        BS2 OFFSET(2) NUMBITS(1) [],
        BS3 OFFSET(3) NUMBITS(1) [],
        BS4 OFFSET(4) NUMBITS(1) [],
        BS5 OFFSET(5) NUMBITS(1) [],
        BS6 OFFSET(6) NUMBITS(1) [],
        BS7 OFFSET(7) NUMBITS(1) [],
        BS8 OFFSET(8) NUMBITS(1) [],
        BS9 OFFSET(9) NUMBITS(1) [],
        BS10 OFFSET(10) NUMBITS(1) [],
        BS11 OFFSET(11) NUMBITS(1) [],
        BS12 OFFSET(12) NUMBITS(1) [],
        BS13 OFFSET(13) NUMBITS(1) [],
        BS14 OFFSET(14) NUMBITS(1) [],
        BS15 OFFSET(15) NUMBITS(1) [],
        BR0 OFFSET(16) NUMBITS(1) [],
        BR1 OFFSET(17) NUMBITS(1) [],
        BR2 OFFSET(18) NUMBITS(1) [],
        BR3 OFFSET(19) NUMBITS(1) [],
        BR4 OFFSET(20) NUMBITS(1) [],
        BR5 OFFSET(21) NUMBITS(1) [],
        BR6 OFFSET(22) NUMBITS(1) [],
        BR7 OFFSET(23) NUMBITS(1) [],
        BR8 OFFSET(24) NUMBITS(1) [],
        BR9 OFFSET(25) NUMBITS(1) [],
        BR10 OFFSET(26) NUMBITS(1) [],
        BR11 OFFSET(27) NUMBITS(1) [],
        BR12 OFFSET(28) NUMBITS(1) [],
        BR13 OFFSET(29) NUMBITS(1) [],
        BR14 OFFSET(30) NUMBITS(1) [],
        BR15 OFFSET(31) NUMBITS(1) []
    ],
    /// GPIO port configuration lock register (GPIOx_LCKR)
    pub LOCK_CFG [
        /// Lock bits, one per pin
        LCK OFFSET(0) NUMBITS(16) [],
        LCK0 OFFSET(0) NUMBITS(1) [],
        LCK1 OFFSET(1) NUMBITS(1) [],
        LCK2 OFFSET(2) NUMBITS(1) [],
        LCK3 OFFSET(3) NUMBITS(1) [],
        LCK4 OFFSET(4) NUMBITS(1) [],
        LCK5 OFFSET(5) NUMBITS(1) [],
        LCK6 OFFSET(6) NUMBITS(1) [],
        LCK7 OFFSET(7) NUMBITS(1) [],
        LCK8 OFFSET(8) NUMBITS(1) [],
        LCK9 OFFSET(9) NUMBITS(1) [],
        LCK10 OFFSET(10) NUMBITS(1) [],
        LCK11 OFFSET(11) NUMBITS(1) [],
        LCK12 OFFSET(12) NUMBITS(1) [],
        LCK13 OFFSET(13) NUMBITS(1) [],
        LCK14 OFFSET(14) NUMBITS(1) [],
        LCK15 OFFSET(15) NUMBITS(1) [],
        /// Lock key
        LCKK OFFSET(16) NUMBITS(1) []
    ],
    /// GPIO alternate function registers (GPIOx_AFRL, GPIOx_AFRH)
    ///
    /// `AFSELn` selects the function of pin `n` in `alt_fn[0]` and of pin
    /// `n + 8` in `alt_fn[1]`. Encodings above `AF7` are reserved on the F0.
    pub ALT_FN [
        AFSEL0 OFFSET(0) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ],
        AFSEL1 OFFSET(4) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ],
        AFSEL2 OFFSET(8) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ],
        AFSEL3 OFFSET(12) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ],
        AFSEL4 OFFSET(16) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ],
        AFSEL5 OFFSET(20) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ],
        AFSEL6 OFFSET(24) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ],
        AFSEL7 OFFSET(28) NUMBITS(4) [
            AF0 = 0,
            AF1 = 1,
            AF2 = 2,
            AF3 = 3,
            AF4 = 4,
            AF5 = 5,
            AF6 = 6,
            AF7 = 7
        ]
    ],
    /// GPIO port bit reset register (GPIOx_BRR)
    pub RESET [
        BR0 OFFSET(0) NUMBITS(1) [],
        BR1 OFFSET(1) NUMBITS(1) [],
        BR2 OFFSET(2) NUMBITS(1) [],
        BR3 OFFSET(3) NUMBITS(1) [],
        BR4 OFFSET(4) NUMBITS(1) [],
        BR5 OFFSET(5) NUMBITS(1) [],
        BR6 OFFSET(6) NUMBITS(1) [],
        BR7 OFFSET(7) NUMBITS(1) [],
        BR8 OFFSET(8) NUMBITS(1) [],
        BR9 OFFSET(9) NUMBITS(1) [],
        BR10 OFFSET(10) NUMBITS(1) [],
        BR11 OFFSET(11) NUMBITS(1) [],
        BR12 OFFSET(12) NUMBITS(1) [],
        BR13 OFFSET(13) NUMBITS(1) [],
        BR14 OFFSET(14) NUMBITS(1) [],
        BR15 OFFSET(15) NUMBITS(1) []
    ]
];

/// Number of pins on one port.
pub const PINS_PER_PORT: usize = 16;

/// Register block of port A.
pub const GPIOA_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4800_0000 as *const GpioRegisters) };

/// Register block of port B.
pub const GPIOB_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4800_0400 as *const GpioRegisters) };

/// Register block of port C.
pub const GPIOC_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4800_0800 as *const GpioRegisters) };

/// The GPIO ports present on every STM32F0 part.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PortId {
    A,
    B,
    C,
}

impl PortId {
    /// Physical address of the port's register block.
    pub const fn base_address(self) -> usize {
        match self {
            PortId::A => 0x4800_0000,
            PortId::B => 0x4800_0400,
            PortId::C => 0x4800_0800,
        }
    }

    /// Register block of the port. The port clock in RCC_AHBENR must be
    /// enabled before the registers are touched.
    pub const fn registers(self) -> StaticRef<GpioRegisters> {
        match self {
            PortId::A => GPIOA_BASE,
            PortId::B => GPIOB_BASE,
            PortId::C => GPIOC_BASE,
        }
    }
}

/// One-bit mask for `pin` in the 1-bit-per-pin registers.
///
/// # Panics
///
/// `pin` must be below [`PINS_PER_PORT`]. A larger value overflows the shift,
/// which panics when overflow checks are on and fails const evaluation.
pub const fn pin_mask(pin: usize) -> u16 {
    1 << pin
}

/// Drive the pins in `set` high and the pins in `clear` low with a single
/// write to `set_reset`.
///
/// A pin present in both masks ends up high; the hardware gives the set
/// half priority.
pub fn set_and_clear(regs: &GpioRegisters, set: u16, clear: u16) {
    regs.set_reset
        .write(SET_RESET::BS.val(u32::from(set)) + SET_RESET::BR.val(u32::from(clear)));
}

/// Freeze the configuration of the pins in `pins` until the next reset.
///
/// Runs the lock-key sequence on `lock_cfg` and returns `Err(())` if the
/// final read-back does not show the lock key set. The caller must make sure
/// nothing else writes `lock_cfg` while this runs.
pub fn lock_pins(regs: &GpioRegisters, pins: u16) -> Result<(), ()> {
    let lock = LOCK_CFG::LCK.val(u32::from(pins));

    regs.lock_cfg.write(lock + LOCK_CFG::LCKK::SET);
    regs.lock_cfg.write(lock + LOCK_CFG::LCKK::CLEAR);
    regs.lock_cfg.write(lock + LOCK_CFG::LCKK::SET);

    // The first read completes the sequence; the second reports the result.
    let _ = regs.lock_cfg.get();
    if regs.lock_cfg.is_set(LOCK_CFG::LCKK) {
        Ok(())
    } else {
        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};
    use tock_registers::interfaces::ReadWriteable;

    const CELLS: usize = 0x2C / 4;

    /// Lay the register block over zeroed RAM, run `f`, and return the
    /// resulting words.
    fn with_scratch(f: impl FnOnce(&GpioRegisters)) -> [u32; CELLS] {
        let mut cells = [0u32; CELLS];
        f(unsafe { &*cells.as_mut_ptr().cast::<GpioRegisters>() });
        cells
    }

    #[test]
    fn port_base_addresses() {
        assert_eq!(GPIOA_BASE.as_ptr() as usize, 0x4800_0000);
        assert_eq!(GPIOB_BASE.as_ptr() as usize, 0x4800_0400);
        assert_eq!(GPIOC_BASE.as_ptr() as usize, 0x4800_0800);

        for port in [PortId::A, PortId::B, PortId::C] {
            assert_eq!(port.registers().as_ptr() as usize, port.base_address());
        }
    }

    #[test]
    fn register_offsets() {
        assert_eq!(offset_of!(GpioRegisters, mode), 0x00);
        assert_eq!(offset_of!(GpioRegisters, out_mode), 0x04);
        assert_eq!(offset_of!(GpioRegisters, speed), 0x08);
        assert_eq!(offset_of!(GpioRegisters, pull), 0x0C);
        assert_eq!(offset_of!(GpioRegisters, input), 0x10);
        assert_eq!(offset_of!(GpioRegisters, output), 0x14);
        assert_eq!(offset_of!(GpioRegisters, set_reset), 0x18);
        assert_eq!(offset_of!(GpioRegisters, lock_cfg), 0x1C);
        assert_eq!(offset_of!(GpioRegisters, alt_fn), 0x20);
        assert_eq!(offset_of!(GpioRegisters, reset), 0x28);
        assert_eq!(size_of::<GpioRegisters>(), 0x2C);
    }

    #[test]
    fn alt_fn_spans_two_cells() {
        let lock_end = offset_of!(GpioRegisters, lock_cfg) + size_of::<u32>();
        assert_eq!(offset_of!(GpioRegisters, alt_fn), lock_end);
        assert_eq!(size_of::<[ReadWrite<u32, ALT_FN::Register>; 2]>(), 8);
        assert_eq!(
            offset_of!(GpioRegisters, alt_fn) + 8,
            offset_of!(GpioRegisters, reset)
        );

        let cells = with_scratch(|regs| {
            regs.alt_fn[0].set(0x1111_1111);
            regs.alt_fn[1].set(0x2222_2222);
        });
        assert_eq!(cells[8], 0x1111_1111);
        assert_eq!(cells[9], 0x2222_2222);
        assert_eq!(cells[7], 0);
        assert_eq!(cells[10], 0);
    }

    #[test]
    fn output_and_set_reset_are_distinct() {
        assert_ne!(
            offset_of!(GpioRegisters, output),
            offset_of!(GpioRegisters, set_reset)
        );

        let cells = with_scratch(|regs| regs.set_reset.set(0xFFFF_FFFF));
        assert_eq!(cells[5], 0);
        assert_eq!(cells[6], 0xFFFF_FFFF);
    }

    #[test]
    fn mode_write_touches_only_mode() {
        let cells = with_scratch(|regs| {
            regs.mode.set(0x0000_0001);
            assert_eq!(regs.mode.get(), 0x0000_0001);
        });
        assert_eq!(cells[0], 0x0000_0001);
        assert!(cells[1..].iter().all(|&word| word == 0));
    }

    #[test]
    fn bitfield_encodings() {
        let cells = with_scratch(|regs| {
            regs.mode.modify(MODE::MODER0::Output + MODE::MODER15::Analog);
            regs.out_mode.modify(OUT_MODE::OT3::OpenDrain);
            regs.speed.modify(SPEED::OSPEEDR1::Medium + SPEED::OSPEEDR2::High);
            regs.pull.modify(PULL::PUPDR4::PullUp + PULL::PUPDR5::PullDown);
            regs.alt_fn[1].modify(ALT_FN::AFSEL7::AF5);
            regs.lock_cfg.modify(LOCK_CFG::LCK9::SET);

            assert!(regs.mode.matches_all(MODE::MODER15::Analog));
            assert_eq!(
                regs.mode.read_as_enum(MODE::MODER0),
                Some(MODE::MODER0::Value::Output)
            );
        });
        assert_eq!(cells[0], 0b01 | (0b11 << 30));
        assert_eq!(cells[1], 1 << 3);
        assert_eq!(cells[2], (0b01 << 2) | (0b11 << 4));
        assert_eq!(cells[3], (0b01 << 8) | (0b10 << 10));
        assert_eq!(cells[7], 1 << 9);
        assert_eq!(cells[9], 5 << 28);
    }

    #[test]
    fn speed_x0_reads_as_low() {
        let cells = with_scratch(|regs| {
            regs.speed.set(0b10);
            assert_eq!(
                regs.speed.read_as_enum(SPEED::OSPEEDR0),
                Some(SPEED::OSPEEDR0::Value::LowAlt)
            );
            assert!(!regs.speed.matches_all(SPEED::OSPEEDR0::Medium));
            assert!(!regs.speed.matches_all(SPEED::OSPEEDR0::High));

            regs.speed.modify(SPEED::OSPEEDR1::LowAlt);
            assert_eq!(
                regs.speed.read_as_enum(SPEED::OSPEEDR1),
                Some(SPEED::OSPEEDR1::Value::LowAlt)
            );
        });
        assert_eq!(cells[2], 0b10 | (0b10 << 2));
    }

    #[test]
    fn pin_mask_in_range() {
        assert_eq!(pin_mask(0), 0x0001);
        assert_eq!(pin_mask(PINS_PER_PORT - 1), 0x8000);
    }

    #[test]
    #[should_panic]
    fn pin_mask_out_of_range_panics() {
        let _ = pin_mask(core::hint::black_box(PINS_PER_PORT));
    }

    #[test]
    fn set_and_clear_is_one_word() {
        let cells = with_scratch(|regs| {
            set_and_clear(regs, pin_mask(0) | pin_mask(15), pin_mask(3));
        });
        assert_eq!(cells[6], 0x0008_8001);
        assert_eq!(cells[5], 0);
    }

    #[test]
    fn lock_pins_leaves_key_set() {
        let mut result = Err(());
        let cells = with_scratch(|regs| {
            result = lock_pins(regs, pin_mask(2) | pin_mask(7));
        });
        assert_eq!(result, Ok(()));
        assert_eq!(cells[7], (1 << 16) | (1 << 7) | (1 << 2));
    }

    #[test]
    fn reset_is_separate_from_set_reset() {
        let cells = with_scratch(|regs| regs.reset.write(RESET::BR4::SET));
        assert_eq!(cells[10], 1 << 4);
        assert_eq!(cells[6], 0);
    }
}
