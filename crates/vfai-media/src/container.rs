//! Container format sniffing.
//!
//! Uploaded video arrives as bare bytes; the original filename extension is
//! never trusted. The leading magic bytes pick the tempfile suffix FFmpeg
//! uses as a demuxer hint.

/// Video container formats recognized by the sniffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Mp4,
    Mov,
    Avi,
    Webm,
    Unknown,
}

impl ContainerFormat {
    /// Detect the container from leading magic bytes.
    ///
    /// ISO BMFF files (mp4/mov) carry `ftyp` at offset 4 with the brand at
    /// offset 8; AVI is a RIFF with an `AVI ` list tag; webm/matroska open
    /// with the EBML header.
    pub fn sniff(data: &[u8]) -> Self {
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"AVI " {
            return ContainerFormat::Avi;
        }
        if data.len() >= 12 && &data[4..8] == b"ftyp" {
            return match &data[8..12] {
                b"qt  " => ContainerFormat::Mov,
                _ => ContainerFormat::Mp4,
            };
        }
        if data.len() >= 4 && data[0..4] == [0x1a, 0x45, 0xdf, 0xa3] {
            return ContainerFormat::Webm;
        }
        ContainerFormat::Unknown
    }

    /// Tempfile suffix used as the FFmpeg demuxer hint.
    ///
    /// Unknown containers fall back to `.mp4`, the most common upload.
    pub fn suffix(&self) -> &'static str {
        match self {
            ContainerFormat::Mp4 | ContainerFormat::Unknown => ".mp4",
            ContainerFormat::Mov => ".mov",
            ContainerFormat::Avi => ".avi",
            ContainerFormat::Webm => ".webm",
        }
    }
}
