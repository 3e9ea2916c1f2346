// Domain separation for protocols/schemes
pub const BLS_TAG: u8 = 0x00;
