/// Length of one caption in the label text table.
pub const LABEL_LEN: usize = 16;

/// Number of remote-control commands that can be learned.
pub const RC_COMMAND_COUNT: usize = 16;

/// Bytes of non-volatile memory used by the persisted layout.
pub const NV_SIZE: usize = 0x33 + RC_COMMAND_COUNT;
