//! Enum contracts: fixed integer code tables
//!
//! Setiap enum adalah newtype terbuka di atas code-nya. Code yang tidak ada di
//! tabel tetap valid: `variant_name()` mengembalikan `None` dan code-nya
//! diteruskan tanpa perubahan saat di-encode ulang. Celah di tabel (misalnya
//! DType 18..=49) adalah reserved.

use std::fmt;

use crate::core::wire::{read_scalar_at, Scalar};
use crate::core::{Follow, Verifiable, Verifier};
use crate::error::Result;

macro_rules! flat_enum {
    (
        $(#[$meta:meta])*
        $name:ident: $repr:ty {
            $($variant:ident = $value:expr,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            $(pub const $variant: Self = Self($value);)*

            /// Semua code yang dikenal, urut sesuai tabel
            pub const ENUM_VALUES: &'static [Self] = &[$(Self::$variant),*];

            #[inline(always)]
            pub fn code(self) -> $repr {
                self.0
            }

            /// Nama simbolik, `None` untuk code yang tidak dikenal
            pub fn variant_name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some(stringify!($variant)),)*
                    _ => None,
                }
            }

            #[inline]
            pub fn is_known(self) -> bool {
                self.variant_name().is_some()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.variant_name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "<UNKNOWN {}>", self.0),
                }
            }
        }

        impl From<$repr> for $name {
            #[inline(always)]
            fn from(code: $repr) -> Self {
                Self(code)
            }
        }

        impl From<$name> for $repr {
            #[inline(always)]
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Scalar for $name {
            const WIDTH: usize = <$repr as Scalar>::WIDTH;

            #[inline(always)]
            fn read_le(src: &[u8]) -> Self {
                Self(<$repr>::read_le(src))
            }

            #[inline(always)]
            fn write_le(self, dst: &mut [u8]) {
                self.0.write_le(dst)
            }
        }

        impl<'buf> Follow<'buf> for $name {
            type Inner = $name;
            const INLINE_SIZE: usize = <$repr as Scalar>::WIDTH;

            #[inline(always)]
            fn follow(buf: &'buf [u8], loc: usize) -> Result<Self::Inner> {
                read_scalar_at::<$name>(buf, loc)
            }
        }

        impl Verifiable for $name {
            const IS_SCALAR: bool = true;

            // Code apa pun diterima
            #[inline]
            fn run_verifier(v: &mut Verifier<'_, '_>, pos: usize) -> Result<()> {
                v.in_buffer(pos, <$repr as Scalar>::WIDTH)
            }
        }
    };
}

flat_enum! {
    /// Tipe element data array
    DType: i8 {
        INHERIT = 0,
        BOOL = 1,
        FLOAT8 = 2,
        HALF = 3,
        HALF2 = 4,
        FLOAT = 5,
        DOUBLE = 6,
        INT8 = 7,
        INT16 = 8,
        INT32 = 9,
        INT64 = 10,
        UINT8 = 11,
        UINT16 = 12,
        UINT32 = 13,
        UINT64 = 14,
        QINT8 = 15,
        QINT16 = 16,
        BFLOAT16 = 17,
        UTF8 = 50,
        UTF16 = 51,
        UTF32 = 52,
    }
}

flat_enum! {
    /// Kategori operasi graph
    OpType: i8 {
        TRANSFORM_FLOAT = 0,
        TRANSFORM_SAME = 1,
        TRANSFORM_BOOL = 2,
        TRANSFORM_STRICT = 3,
        TRANSFORM_ANY = 4,
        REDUCE_FLOAT = 5,
        REDUCE_SAME = 6,
        REDUCE_LONG = 7,
        REDUCE_BOOL = 8,
        INDEX_REDUCE = 9,
        RANDOM = 10,
        LOSS = 11,
        BROADCAST = 12,
        BROADCAST_BOOL = 13,
        PAIRWISE = 14,
        PAIRWISE_BOOL = 15,
        REDUCE_3 = 16,
        SUMMARYSTATS = 17,
        SCALAR = 18,
        SCALAR_BOOL = 19,
        SHAPE = 20,
        CUSTOM = 21,
        GRAPH = 22,
        VARIABLE = 30,
        BOOLEAN = 40,
        LOGIC = 119,
    }
}

flat_enum! {
    /// Byte order data di dalam `FlatArray.buffer`
    ByteOrder: i8 {
        LE = 0,
        BE = 1,
    }
}

flat_enum! {
    VarType: i8 {
        VARIABLE = 0,
        CONSTANT = 1,
        ARRAY = 2,
        PLACEHOLDER = 3,
    }
}

flat_enum! {
    ExecutionMode: i8 {
        SEQUENTIAL = 0,
        STRICT = 1,
        AUTO = 2,
    }
}

flat_enum! {
    /// Reaksi engine terhadap NaN/Inf saat eksekusi
    ProfilingMode: i8 {
        NONE = 0,
        NAN_PANIC = 1,
        INF_PANIC = 2,
        ANY_PANIC = 3,
    }
}

flat_enum! {
    /// Variable mana yang dikembalikan di response
    OutputMode: i8 {
        IMPLICIT = 0,
        EXPLICIT = 1,
        EXPLICIT_AND_IMPLICIT = 2,
        VARIABLE_SPACE = 3,
        OPTIMIZED = 4,
    }
}

flat_enum! {
    Direction: i8 {
        FORWARD_ONLY = 0,
        FORWARD_AND_BACKWARD = 1,
        BACKWARD_ONLY = 2,
    }
}

flat_enum! {
    /// Jenis payload static info record
    UiInfoType: i8 {
        GRAPH_STRUCTURE = 0,
        SYSTEM_INFO = 1,
        START_EVENTS = 2,
    }
}
