//! Animated placeholder shown while an image is being transformed.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Shimmering gradient SVG of the given size.
pub fn shimmer_svg(width: u32, height: u32) -> String {
    format!(
        r##"
<svg width="{width}" height="{height}" version="1.1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <defs>
    <linearGradient id="g">
      <stop stop-color="#7986AC" offset="20%" />
      <stop stop-color="#68769e" offset="50%" />
      <stop stop-color="#7986AC" offset="70%" />
    </linearGradient>
  </defs>
  <rect width="{width}" height="{height}" fill="#7986AC" />
  <rect id="r" width="{width}" height="{height}" fill="url(#g)" />
  <animate xlink:href="#r" attributeName="x" from="-{width}" to="{width}" dur="1s" repeatCount="indefinite"  />
</svg>"##
    )
}

/// [`shimmer_svg`] as a base64 `data:` URL, usable directly as an image source.
pub fn shimmer_data_url(width: u32, height: u32) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(shimmer_svg(width, height))
    )
}
