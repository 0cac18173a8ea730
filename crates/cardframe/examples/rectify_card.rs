use cardframe::{CardRectifier, CardScanError};
use image::ImageReader;

#[cfg(feature = "tracing")]
use cardframe_core::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("Usage: rectify_card <input_image> <output_image>");
        return Ok(());
    };

    let capture = ImageReader::open(input)?.decode()?.to_rgba8();
    match CardRectifier::default().rectify(&capture) {
        Ok(card) => {
            card.save(&output)?;
            println!("wrote {}x{} to {output}", card.width(), card.height());
        }
        Err(CardScanError::ShapeNotFound) => println!("no card-like shape found"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
