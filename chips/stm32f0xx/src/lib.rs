// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral register maps for the STM32F0xx MCU.
//!
//! STM32F0 reference manual (RM0091):
//! <https://www.st.com/resource/en/reference_manual/rm0091-stm32f0x1stm32f0x2stm32f0x8-advanced-armbased-32bit-mcus-stmicroelectronics.pdf>

#![no_std]

mod static_ref;
pub use self::static_ref::StaticRef;

// Peripherals
pub mod gpio;
