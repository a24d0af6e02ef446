//! Frame tables of the supported format versions.

use super::tag::{DOT, PAGE_INFO, PEN_DOWN, PEN_UP, SESSION_INFO};
use super::{
    DotLayout, FieldLimits, FormatSpec, FormatVersion, FrameRule, PrefixWidth, ScaleTable,
    SESSION_INFO_LEN,
};

/// One Ncode unit is 2.371 mm; raw coordinates are hundredths of a unit.
const MM_PER_RAW_UNIT: f64 = 2.371 / 100.0;

const NCODE_SCALE_8BIT: ScaleTable = ScaleTable {
    x_scale: MM_PER_RAW_UNIT,
    y_scale: MM_PER_RAW_UNIT,
    pressure_max: 255.0,
};

const V1_FRAMES: &[(u8, FrameRule)] = &[
    (SESSION_INFO, FrameRule::Fixed(SESSION_INFO_LEN)),
    (PAGE_INFO, FrameRule::Fixed(12)),
    (PEN_DOWN, FrameRule::Fixed(8)),
    (DOT, FrameRule::Fixed(8)),
    (PEN_UP, FrameRule::Fixed(8)),
];

const V2_FRAMES: &[(u8, FrameRule)] = &[
    (SESSION_INFO, FrameRule::Fixed(SESSION_INFO_LEN)),
    (
        PAGE_INFO,
        FrameRule::Prefixed {
            width: PrefixWidth::U8,
            min: 12,
        },
    ),
    (
        PEN_DOWN,
        FrameRule::Prefixed {
            width: PrefixWidth::U8,
            min: 8,
        },
    ),
    (
        DOT,
        FrameRule::Prefixed {
            width: PrefixWidth::U8,
            min: 18,
        },
    ),
    (
        PEN_UP,
        FrameRule::Prefixed {
            width: PrefixWidth::U8,
            min: 8,
        },
    ),
];

/// Headerless stroke blocks. The legacy reader synthesises v1-shaped records,
/// so the frame table is only consulted by the decoder.
pub static LEGACY: FormatSpec = FormatSpec {
    version: FormatVersion::Legacy,
    frames: V1_FRAMES,
    fallback: FrameRule::Prefixed {
        width: PrefixWidth::U16,
        min: 0,
    },
    dot_layout: DotLayout::Compact,
    limits: FieldLimits {
        pressure_max: 255,
        fraction_max: 99,
    },
    scale: NCODE_SCALE_8BIT,
};

pub static V1: FormatSpec = FormatSpec {
    version: FormatVersion::V1,
    frames: V1_FRAMES,
    fallback: FrameRule::Prefixed {
        width: PrefixWidth::U16,
        min: 0,
    },
    dot_layout: DotLayout::Compact,
    limits: FieldLimits {
        pressure_max: 255,
        fraction_max: 99,
    },
    scale: NCODE_SCALE_8BIT,
};

pub static V2: FormatSpec = FormatSpec {
    version: FormatVersion::V2,
    frames: V2_FRAMES,
    fallback: FrameRule::Prefixed {
        width: PrefixWidth::U8,
        min: 0,
    },
    dot_layout: DotLayout::Extended,
    limits: FieldLimits {
        pressure_max: 1023,
        fraction_max: 99,
    },
    scale: ScaleTable {
        x_scale: MM_PER_RAW_UNIT,
        y_scale: MM_PER_RAW_UNIT,
        pressure_max: 1023.0,
    },
};
