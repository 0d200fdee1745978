//! Messages generated by `protofield-build` at build time, exercised by the
//! tests in `tests/`.

include!(concat!(env!("OUT_DIR"), "/scalars.rs"));
include!(concat!(env!("OUT_DIR"), "/envelope.rs"));
include!(concat!(env!("OUT_DIR"), "/ticket.rs"));
include!(concat!(env!("OUT_DIR"), "/setting.rs"));
