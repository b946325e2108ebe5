//! EXIF/TIFF format constants
//!
//! This module defines constants used throughout the EXIF parsing code,
//! replacing magic numbers with descriptive names.

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// "MM" byte order marker for big-endian
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];
}

/// JPEG marker constants, for locating the EXIF APP1 segment
pub mod jpeg {
    /// Start-of-image marker bytes
    pub const SOI: [u8; 2] = [0xFF, 0xD8];

    /// APP1 marker byte (follows 0xFF)
    pub const APP1: u8 = 0xE1;

    /// Start-of-scan marker byte; entropy-coded data follows, stop scanning
    pub const SOS: u8 = 0xDA;

    /// Identifier at the start of an EXIF APP1 payload
    pub const EXIF_IDENTIFIER: [u8; 6] = [b'E', b'x', b'i', b'f', 0, 0];
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
}

/// EXIF tags of interest
pub mod tags {
    /// Free-form description of the image (IFD0, ASCII)
    pub const IMAGE_DESCRIPTION: u16 = 270;

    /// Pointer from IFD0 to the Exif sub-IFD (LONG)
    pub const EXIF_IFD_POINTER: u16 = 34665;

    /// Free-form user comment (Exif IFD, UNDEFINED with charset prefix)
    pub const USER_COMMENT: u16 = 37510;
}

/// Character-code prefixes for the UserComment tag (first 8 bytes)
pub mod user_comment {
    pub const ASCII: [u8; 8] = [b'A', b'S', b'C', b'I', b'I', 0, 0, 0];
    pub const UNICODE: [u8; 8] = [b'U', b'N', b'I', b'C', b'O', b'D', b'E', 0];
    pub const JIS: [u8; 8] = [b'J', b'I', b'S', 0, 0, 0, 0, 0];
    pub const UNDEFINED: [u8; 8] = [0; 8];
}
