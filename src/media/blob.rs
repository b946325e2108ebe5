//! Caller-owned media byte buffer

/// A fully-loaded media file held in memory
///
/// The blob is owned by the caller; the engine only ever borrows it
/// read-only for the duration of a single extraction call. The MIME
/// type and filename are hints carried along for logging and
/// inspection output, the sniffer works on bytes alone.
#[derive(Debug, Clone, Copy)]
pub struct MediaBlob<'a> {
    bytes: &'a [u8],
    mime_type: Option<&'a str>,
    filename: Option<&'a str>,
}

impl<'a> MediaBlob<'a> {
    /// Creates a blob over a byte slice with no hints
    pub fn new(bytes: &'a [u8]) -> Self {
        MediaBlob {
            bytes,
            mime_type: None,
            filename: None,
        }
    }

    /// Creates a blob with optional MIME type and filename hints
    pub fn with_hints(bytes: &'a [u8], mime_type: Option<&'a str>, filename: Option<&'a str>) -> Self {
        MediaBlob {
            bytes,
            mime_type,
            filename,
        }
    }

    /// The raw bytes of the media file
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The declared MIME type, if the caller provided one
    pub fn mime_type(&self) -> Option<&'a str> {
        self.mime_type
    }

    /// The filename hint, if the caller provided one
    pub fn filename(&self) -> Option<&'a str> {
        self.filename
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true for an empty buffer
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
