//! `access_flags` bits shared by classes, fields and methods (JVMS 4.1, 4.5, 4.6).

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ENUM: u16 = 0x4000;

/// Replaces any public/protected visibility bits with `ACC_PRIVATE`.
pub fn make_private(access_flags: u16) -> u16 {
    access_flags & !(ACC_PUBLIC | ACC_PROTECTED) | ACC_PRIVATE
}
