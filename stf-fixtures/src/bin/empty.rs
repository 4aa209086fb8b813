//! A test program that registers nothing.

stf::main!();
