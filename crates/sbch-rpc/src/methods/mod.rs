//! RPC method handlers by namespace

pub mod sbch;
