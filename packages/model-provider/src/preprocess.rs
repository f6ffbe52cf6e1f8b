/// # Image Preprocessing
/// Resize and ImageNet-normalize a leaf image into an NCHW tensor
use mangoscan_types::LeafImage;
use mangoscan_types::image::imageops::{self, FilterType};
use ndarray::Array4;

pub const DEFAULT_INPUT_SIZE: u32 = 224;

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Returns a `(1, 3, height, width)` tensor, channels normalized with the ImageNet statistics.
pub fn to_input_tensor(image: &LeafImage, width: u32, height: u32) -> Array4<f32> {
    let (img_w, img_h) = image.dimensions();
    let resized = if img_w == width && img_h == height {
        image.pixels().clone()
    } else {
        imageops::resize(image.pixels(), width, height, FilterType::Triangle)
    };

    Array4::<f32>::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| {
            let p = resized.get_pixel(x as u32, y as u32);
            (p[c] as f32 / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c]
        },
    )
}
