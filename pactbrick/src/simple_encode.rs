//! Straightforward encoder: no object streams, no xref streams, classic
//! `xref` table and `trailer`.

pub(crate) mod object;
pub(crate) mod section;

pub struct SimpleEncoder;
