use std::fmt;

/// Fixed-width value that can be packed into, and read back out of, a row field.
///
/// Values are stored little-endian. `read` is only ever handed a slice of
/// exactly [`Field::WIDTH`] bytes; callers check the column width first.
pub trait Field: Copy {
    /// Number of bytes the value occupies inside a row.
    const WIDTH: usize;

    /// Decodes a value from exactly `WIDTH` bytes.
    fn read(bytes: &[u8]) -> Option<Self>;

    /// Encodes the value into exactly `WIDTH` bytes.
    fn write(self, out: &mut [u8]);
}

/// Numeric representation used for quantitative columns.
///
/// Importers, exporters and statistics are generic over this trait; the
/// default representation throughout the crate is `f64`.
pub trait Quantity: Field + fmt::Display {
    /// Whether only integral tokens can be represented.
    const INTEGRAL: bool;

    /// Parses a text token. Surrounding whitespace is ignored.
    fn parse_token(token: &str) -> Option<Self>;

    /// Widens the value for accumulation.
    fn to_f64(self) -> f64;
}

macro_rules! impl_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn read(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$ty>::from_le_bytes)
                }

                fn write(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_field!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl<const N: usize> Field for [u8; N] {
    const WIDTH: usize = N;

    fn read(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok()
    }

    fn write(self, out: &mut [u8]) {
        out.copy_from_slice(&self);
    }
}

macro_rules! impl_quantity {
    ($($ty:ty => $integral:expr),* $(,)?) => {
        $(
            impl Quantity for $ty {
                const INTEGRAL: bool = $integral;

                fn parse_token(token: &str) -> Option<Self> {
                    let token = token.trim();
                    let token = token.strip_prefix('+').unwrap_or(token);
                    token.parse::<$ty>().ok()
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_quantity!(f64 => false, f32 => false, i64 => true, i32 => true);

/// Returns the text stored in a categorical field: the bytes up to the first
/// NUL, or the whole field when it carries no terminator.
pub fn field_text(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}
