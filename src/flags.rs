//! Per-opcode flag bitfields.

use bitflags::bitflags;

bitflags! {
    /// OP_UPDATE flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpUpdateFlags: u32 {
        const UPSERT = 1 << 0;
        const MULTI_UPDATE = 1 << 1;
    }
}

bitflags! {
    /// OP_INSERT flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpInsertFlags: i32 {
        const CONTINUE_ON_ERROR = 1 << 0;
    }
}

bitflags! {
    /// OP_QUERY flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpQueryFlags: u32 {
        const TAILABLE_CURSOR = 1 << 1;
        const SLAVE_OK = 1 << 2;
        const OPLOG_REPLAY = 1 << 3;
        const NO_CURSOR_TIMEOUT = 1 << 4;
        const AWAIT_DATA = 1 << 5;
        const EXHAUST = 1 << 6;
        const PARTIAL = 1 << 7;
    }
}

bitflags! {
    /// OP_DELETE flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpDeleteFlags: u32 {
        const SINGLE_REMOVE = 1 << 0;
    }
}

bitflags! {
    /// OP_REPLY flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpReplyFlags: i32 {
        const CURSOR_NOT_FOUND = 1 << 0;
        const QUERY_FAILURE = 1 << 1;
        const SHARD_CONFIG_STATE = 1 << 2;
        const AWAIT_CAPABLE = 1 << 3;
    }
}

bitflags! {
    /// OP_MSG flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpMsgFlags: u32 {
        const CHECKSUM_PRESENT = 1 << 0;
        const MORE_TO_COME = 1 << 1;
        const EXHAUST_ALLOWED = 1 << 16;
    }
}
