#![no_std]

pub mod panic;
