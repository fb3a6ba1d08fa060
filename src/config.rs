/// Order in which [`Bitmap::encode_with`](crate::Bitmap::encode_with) writes
/// pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Last row first, positive height. What nearly every reader expects.
    #[default]
    BottomUp,

    /// First row first, written with a negative height.
    TopDown,
}

/// Options for reading and writing bitmap files.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    pub row_order: RowOrder,
    pub pixels_per_meter: i32,
    pub max_dimension: Option<u32>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            row_order: RowOrder::BottomUp,
            // 72 DPI
            pixels_per_meter: 2835,
            max_dimension: Some(65535),
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct CodecConfigBuilder {
    row_order: Option<RowOrder>,
    pixels_per_meter: Option<i32>,
    max_dimension: Option<Option<u32>>,
}

impl CodecConfigBuilder {
    pub fn row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = Some(row_order);
        self
    }

    pub fn pixels_per_meter(mut self, pixels_per_meter: i32) -> Self {
        self.pixels_per_meter = Some(pixels_per_meter);
        self
    }

    pub fn max_dimension(mut self, max: Option<u32>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> CodecConfig {
        let default = CodecConfig::default();
        CodecConfig {
            row_order: self.row_order.unwrap_or(default.row_order),
            pixels_per_meter: self.pixels_per_meter.unwrap_or(default.pixels_per_meter),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides() {
        let config = CodecConfig::builder()
            .row_order(RowOrder::TopDown)
            .max_dimension(None)
            .build();

        assert_eq!(config.row_order, RowOrder::TopDown);
        assert_eq!(config.max_dimension, None);
        assert_eq!(config.pixels_per_meter, 2835);
    }

    #[test]
    fn builder_defaults() {
        let config = CodecConfig::builder().build();

        assert_eq!(config.row_order, RowOrder::BottomUp);
        assert_eq!(config.max_dimension, Some(65535));
    }
}
