use histmatch::{
    build_histogram, Channels, HistMatchError, Histogram, HistogramKind, PixelArray, PixelLayout,
};

#[test]
fn pixel_array_rejects_invalid_dimensions() {
    let err = PixelArray::grey(vec![0u8; 4], 0, 1).unwrap_err();
    assert_eq!(
        err,
        HistMatchError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = PixelArray::rgb(vec![0u8; 11], 2, 2).unwrap_err();
    assert_eq!(err, HistMatchError::BufferTooSmall { needed: 12, got: 11 });
}

#[test]
fn pixel_array_reports_dimensions() {
    let img = PixelArray::rgb((0u8..18).collect(), 3, 2).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.pixel_count(), 6);
    assert_eq!(img.layout(), PixelLayout::Rgb);
    assert_eq!(img.rgb_pixels().next(), Some([0, 1, 2]));
}

#[test]
fn solid_red_image_histogram() {
    let img = PixelArray::solid_rgb(10, 10, [254, 0, 0]).unwrap();
    let hist = build_histogram(img, 255, false).unwrap();

    assert_eq!(hist.kind(), HistogramKind::Color);
    assert_eq!(hist.bins(), 255);
    let red = hist.red().unwrap();
    assert_eq!(red[254], 100);
    assert_eq!(red.iter().filter(|&&c| c > 0).count(), 1);
    assert_eq!(hist.green().unwrap().iter().sum::<u64>(), 100);
    assert_eq!(hist.green().unwrap()[0], 100);
    assert_eq!(hist.blue().unwrap()[0], 100);
}

#[test]
fn solid_grey_image_histogram() {
    let img = PixelArray::solid_rgb(10, 10, [150, 150, 150]).unwrap();
    let hist = build_histogram(img, 255, false).unwrap();

    assert_eq!(hist.kind(), HistogramKind::Grey);
    let grey = hist.grey().unwrap();
    assert_eq!(grey[150], 100);
    assert_eq!(grey.iter().filter(|&&c| c > 0).count(), 1);
}

#[test]
fn every_channel_sums_to_pixel_count() {
    let data: Vec<u8> = (0..7 * 5 * 3).map(|i| ((i * 37) % 256) as u8).collect();
    let img = PixelArray::rgb(data, 7, 5).unwrap();
    let hist = build_histogram(img, 40, false).unwrap();
    match hist.channels() {
        Channels::Color { red, green, blue } => {
            for channel in [red, green, blue] {
                assert_eq!(channel.len(), 40);
                assert_eq!(channel.iter().sum::<u64>(), 35);
            }
        }
        Channels::Grey(_) => panic!("expected a color histogram"),
    }
}

#[test]
fn injected_channels_are_validated() {
    let mut hist = Histogram::from_grey(vec![1, 2, 3]).unwrap();
    assert_eq!(
        hist.set_grey(vec![1, 2]).unwrap_err(),
        HistMatchError::ChannelLength { bins: 3, got: 2 }
    );
    hist.set_grey(vec![3, 2, 1]).unwrap();
    assert_eq!(hist.grey(), Some(&[3u64, 2, 1][..]));

    let err = build_histogram(PixelArray::grey(vec![1], 1, 1).unwrap(), 0, false).unwrap_err();
    assert!(matches!(err, HistMatchError::InvalidHistogram { .. }));
}
