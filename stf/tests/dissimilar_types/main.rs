//! Assertions whose operands have different types.

mod integrals;
mod objects;

stf::main!(integrals::register, objects::register);
