use boxmatch::lowlevel::resize_u8_bilinear;
use boxmatch::{
    BoxMatchError, DetectConfig, Detector, InMemoryAssets, NmsPolicy, OwnedImage, Size,
    TemplateDescriptor,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn noise(rng: &mut StdRng, width: usize, height: usize) -> OwnedImage {
    let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
    OwnedImage::new(data, width, height).unwrap()
}

fn paste(canvas: &mut [u8], canvas_width: usize, patch: &OwnedImage, x0: usize, y0: usize) {
    for y in 0..patch.height() {
        let src = &patch.data()[y * patch.width()..(y + 1) * patch.width()];
        let start = (y0 + y) * canvas_width + x0;
        canvas[start..start + patch.width()].copy_from_slice(src);
    }
}

struct Scene {
    source: OwnedImage,
    assets: InMemoryAssets,
}

/// Noise background with an apple at (10, 12) and two distinct banana
/// templates at (60, 8) and (30, 50).
fn fruit_scene() -> Scene {
    let mut rng = StdRng::seed_from_u64(2024);
    let (width, height) = (96, 80);
    let background = noise(&mut rng, width, height);
    let apple = noise(&mut rng, 16, 16);
    let banana = noise(&mut rng, 20, 12);
    let banana2 = noise(&mut rng, 12, 20);

    let mut canvas = background.data().to_vec();
    paste(&mut canvas, width, &apple, 10, 12);
    paste(&mut canvas, width, &banana, 60, 8);
    paste(&mut canvas, width, &banana2, 30, 50);
    let source = OwnedImage::new(canvas, width, height).unwrap();

    let assets = InMemoryAssets::new()
        .with("apple", apple)
        .with("banana", banana)
        .with("banana2", banana2);
    Scene { source, assets }
}

fn placements(report: &boxmatch::DetectionReport) -> Vec<(&str, usize, usize, usize, usize)> {
    report
        .iter()
        .map(|d| {
            (
                &*d.label,
                d.bbox.x(),
                d.bbox.y(),
                d.bbox.width(),
                d.bbox.height(),
            )
        })
        .collect()
}

#[test]
fn detects_each_template_once_in_template_order() {
    let scene = fruit_scene();
    let templates = [
        TemplateDescriptor::new("apple", "Apple"),
        TemplateDescriptor::new("banana", "Banana"),
        TemplateDescriptor::new("banana2", "Banana"),
    ];
    let report = Detector::new()
        .detect(scene.source.view(), &templates, &scene.assets)
        .unwrap();

    assert!(report.skipped.is_empty());
    assert_eq!(
        placements(&report),
        vec![
            ("Apple", 10, 12, 16, 16),
            ("Banana", 60, 8, 20, 12),
            ("Banana", 30, 50, 12, 20),
        ]
    );
    assert!(report.iter().all(|d| d.score > 0.99));

    let counts = report.count_by_label();
    assert_eq!(counts.get("Apple"), Some(&1));
    assert_eq!(counts.get("Banana"), Some(&2));
}

#[test]
fn suppression_never_crosses_templates_with_a_shared_label() {
    let mut rng = StdRng::seed_from_u64(17);
    let source = noise(&mut rng, 30, 24);
    let crop = |x, y| OwnedImage::from_view(source.view().roi(x, y, 10, 10).unwrap()).unwrap();
    let assets = InMemoryAssets::new()
        .with("left", crop(5, 5))
        .with("right", crop(6, 5));
    let templates = [
        TemplateDescriptor::new("left", "Banana"),
        TemplateDescriptor::new("right", "Banana"),
    ];

    for policy in [NmsPolicy::ScoreDescending, NmsPolicy::FirstInOrder] {
        let report = Detector::new()
            .with_config(DetectConfig {
                nms_policy: policy,
                ..DetectConfig::default()
            })
            .detect(source.view(), &templates, &assets)
            .unwrap();
        let found = placements(&report);
        assert_eq!(
            found,
            vec![("Banana", 5, 5, 10, 10), ("Banana", 6, 5, 10, 10)],
            "{policy:?}"
        );
        // Joint suppression would drop one of these.
        assert!(report.detections[0].bbox.iou(&report.detections[1].bbox) > 0.5);
    }
}

#[test]
fn first_in_order_policy_gives_the_same_scene_result() {
    let scene = fruit_scene();
    let templates = [
        TemplateDescriptor::new("banana2", "Banana"),
        TemplateDescriptor::new("apple", "Apple"),
    ];
    let report = Detector::new()
        .with_config(DetectConfig {
            nms_policy: NmsPolicy::FirstInOrder,
            ..DetectConfig::default()
        })
        .detect(scene.source.view(), &templates, &scene.assets)
        .unwrap();
    assert_eq!(
        placements(&report),
        vec![("Banana", 30, 50, 12, 20), ("Apple", 10, 12, 16, 16)]
    );
}

#[test]
fn missing_template_is_skipped_and_others_still_run() {
    let scene = fruit_scene();
    let templates = [
        TemplateDescriptor::new("apple", "Apple"),
        TemplateDescriptor::new("cherry", "Cherry"),
        TemplateDescriptor::new("banana", "Banana"),
    ];
    let report = Detector::new()
        .detect(scene.source.view(), &templates, &scene.assets)
        .unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    let skipped = &report.skipped[0];
    assert_eq!(skipped.asset, "cherry");
    assert_eq!(&*skipped.label, "Cherry");
    assert_eq!(
        skipped.reason,
        BoxMatchError::AssetNotFound {
            id: "cherry".to_owned()
        }
    );
}

#[test]
fn degenerate_template_is_skipped() {
    let scene = fruit_scene();
    let assets = scene
        .assets
        .clone()
        .with("blank", OwnedImage::new(vec![128u8; 64], 8, 8).unwrap());
    let templates = [
        TemplateDescriptor::new("blank", "Blank"),
        TemplateDescriptor::new("apple", "Apple"),
    ];
    let report = Detector::new()
        .detect(scene.source.view(), &templates, &assets)
        .unwrap();
    assert_eq!(placements(&report), vec![("Apple", 10, 12, 16, 16)]);
    assert!(matches!(
        report.skipped[0].reason,
        BoxMatchError::DegenerateTemplate { .. }
    ));
}

#[test]
fn oversized_template_is_resized_before_matching() {
    let mut rng = StdRng::seed_from_u64(99);
    let (width, height) = (64, 48);
    let big = noise(&mut rng, 80, 30);
    let fitted = resize_u8_bilinear(big.view(), Size::new(32, 24)).unwrap();

    let mut canvas = noise(&mut rng, width, height).data().to_vec();
    paste(&mut canvas, width, &fitted, 20, 14);
    let source = OwnedImage::new(canvas, width, height).unwrap();
    let assets = InMemoryAssets::new().with("big", big);

    let report = Detector::new()
        .detect(
            source.view(),
            &[TemplateDescriptor::new("big", "Melon")],
            &assets,
        )
        .unwrap();
    assert_eq!(placements(&report), vec![("Melon", 20, 14, 32, 24)]);
}

#[test]
fn nothing_found_is_an_empty_report() {
    let scene = fruit_scene();
    let mut rng = StdRng::seed_from_u64(5);
    let assets = scene.assets.clone().with("kiwi", noise(&mut rng, 14, 14));
    let report = Detector::new()
        .detect(
            scene.source.view(),
            &[TemplateDescriptor::new("kiwi", "Kiwi")],
            &assets,
        )
        .unwrap();
    assert!(report.is_empty());
    assert!(report.skipped.is_empty());
}

#[test]
fn missing_source_is_fatal() {
    let scene = fruit_scene();
    let err = Detector::new()
        .detect_asset(
            "basket",
            &[TemplateDescriptor::new("apple", "Apple")],
            &scene.assets,
        )
        .unwrap_err();
    assert!(matches!(err, BoxMatchError::SourceUnavailable { .. }));
}

#[test]
fn source_loaded_through_assets() {
    let scene = fruit_scene();
    let assets = scene.assets.clone().with("basket", scene.source.clone());
    let report = Detector::new()
        .detect_asset(
            "basket",
            &[TemplateDescriptor::new("apple", "Apple")],
            &assets,
        )
        .unwrap();
    assert_eq!(placements(&report), vec![("Apple", 10, 12, 16, 16)]);
}

#[test]
fn invalid_oversize_scale_is_rejected() {
    let scene = fruit_scene();
    let err = Detector::new()
        .with_config(DetectConfig {
            oversize_scale: 1.5,
            ..DetectConfig::default()
        })
        .detect(scene.source.view(), &[], &scene.assets)
        .unwrap_err();
    assert!(matches!(err, BoxMatchError::InvalidInput(_)));
}

#[test]
fn non_finite_thresholds_are_rejected() {
    let scene = fruit_scene();
    let templates = [TemplateDescriptor::new("apple", "Apple")];
    let configs = [
        DetectConfig {
            score_threshold: f32::NAN,
            ..DetectConfig::default()
        },
        DetectConfig {
            iou_threshold: f64::NAN,
            ..DetectConfig::default()
        },
        DetectConfig {
            score_threshold: f32::INFINITY,
            ..DetectConfig::default()
        },
    ];
    for config in configs {
        let err = Detector::new()
            .with_config(config)
            .detect(scene.source.view(), &templates, &scene.assets)
            .unwrap_err();
        assert!(matches!(err, BoxMatchError::InvalidInput(_)));
    }
}
