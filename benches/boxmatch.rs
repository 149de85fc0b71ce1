use boxmatch::lowlevel::{zncc_grid, TemplatePlan};
use boxmatch::{
    suppress, BBox, Candidate, DetectConfig, Detector, ImageView, InMemoryAssets, NmsPolicy,
    OwnedImage, TemplateDescriptor,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn extract_patch(
    image: &[u8],
    img_width: usize,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = (y0 + y) * img_width;
        out.extend_from_slice(&image[row + x0..row + x0 + width]);
    }
    out
}

fn bench_detect(c: &mut Criterion) {
    let img_width = 256;
    let img_height = 192;
    let image = make_image(img_width, img_height);
    let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();

    let tpl_data = extract_patch(&image, img_width, 40, 30, 32, 32);
    let tpl = OwnedImage::new(tpl_data, 32, 32).unwrap();
    let plan = TemplatePlan::from_view(tpl.view()).unwrap();

    c.bench_function("zncc_grid_256x192_32x32", |b| {
        b.iter(|| black_box(zncc_grid(image_view, &plan, 1e-8).unwrap()));
    });

    let assets = InMemoryAssets::new()
        .with("a", tpl.clone())
        .with(
            "b",
            OwnedImage::new(extract_patch(&image, img_width, 150, 100, 24, 40), 24, 40).unwrap(),
        );
    let templates = [
        TemplateDescriptor::new("a", "Apple"),
        TemplateDescriptor::new("b", "Banana"),
    ];
    let detector = Detector::new();
    c.bench_function("detect_two_templates", |b| {
        b.iter(|| black_box(detector.detect(image_view, &templates, &assets).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let detector_par = Detector::new().with_config(DetectConfig {
            parallel: true,
            ..DetectConfig::default()
        });
        c.bench_function("detect_two_templates_parallel", |b| {
            b.iter(|| black_box(detector_par.detect(image_view, &templates, &assets).unwrap()));
        });
    }
}

fn bench_nms(c: &mut Criterion) {
    let label: Arc<str> = Arc::from("Apple");
    let candidates: Vec<Candidate> = (0..2000)
        .map(|i| Candidate {
            bbox: BBox::new((i * 7) % 200, (i * 13) % 150, 24, 24).unwrap(),
            score: ((i * 31) % 100) as f32 / 100.0,
            label: Arc::clone(&label),
        })
        .collect();

    for policy in [NmsPolicy::FirstInOrder, NmsPolicy::ScoreDescending] {
        c.bench_function(&format!("nms_2000_{policy:?}"), |b| {
            b.iter(|| black_box(suppress(candidates.clone(), 0.5, policy)));
        });
    }
}

criterion_group!(benches, bench_detect, bench_nms);
criterion_main!(benches);
