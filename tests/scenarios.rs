use cut_planner::assemble::{BinLayout, PackResult};
use cut_planner::engine::{pack_batch, pack_material, plan_quotes};
use cut_planner::error::Error;
use cut_planner::model::{Material, PackRequest, PieceRequest, PlanRequest, Quote};
use cut_planner::solver::PackOptions;
use cut_planner::types::RejectReason;
use cut_planner::units::to_mm;

fn pack_sheet(material: Material, pieces: Vec<PieceRequest>) -> PackResult {
    let request = PackRequest { material, pieces };
    let outcome = pack_material(&request, &PackOptions::default()).unwrap();
    outcome.as_sheet().cloned().expect("sheet outcome")
}

/// Bounds and overlap checks done back in millimeters.
fn assert_bin_valid(bin: &BinLayout) {
    let (bw, bh) = (to_mm(bin.width), to_mm(bin.height));
    let rects: Vec<_> = bin
        .placements
        .iter()
        .map(|p| (to_mm(p.x), to_mm(p.y), to_mm(p.width), to_mm(p.height)))
        .collect();
    for &(x, y, w, h) in &rects {
        assert!(x >= 0 && y >= 0 && x + w <= bw && y + h <= bh, "{} out of bounds", bin.bin_id);
    }
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            let (ax, ay, aw, ah) = rects[i];
            let (bx, by, bw, bh) = rects[j];
            let overlaps = ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah;
            assert!(!overlaps, "{}: placements {i} and {j} overlap", bin.bin_id);
        }
    }
}

#[test]
fn three_shelves_fit_one_sheet() {
    let result = pack_sheet(
        Material::sheet("MDF", 1.0, 2.0),
        vec![PieceRequest::new("shelf", 0.6, 0.4, 3)],
    );
    assert_eq!(result.bin_count, 1);
    assert_eq!(result.bins[0].placements.len(), 3);
    assert!(result.rejected_pieces.is_empty());
    assert_bin_valid(&result.bins[0]);
}

#[test]
fn long_piece_is_turned_on_grained_sheet() {
    let result = pack_sheet(
        Material::sheet("Oak veneer", 1.0, 2.0).with_rotation(false),
        vec![PieceRequest::new("side", 1.5, 0.4, 1)],
    );
    assert_eq!(result.bin_count, 1);
    let placements = &result.bins[0].placements;
    assert_eq!(placements.len(), 1);
    assert!(placements[0].rotated);
    assert_eq!((placements[0].width, placements[0].height), (0.4, 1.5));
    assert_bin_valid(&result.bins[0]);
}

#[test]
fn oversized_piece_is_reported_not_placed() {
    let result = pack_sheet(
        Material::sheet("MDF", 1.0, 1.0),
        vec![PieceRequest::new("top", 1.2, 1.2, 1)],
    );
    assert_eq!(result.bin_count, 0);
    assert!(result.bins.is_empty());
    assert_eq!(result.rejected_pieces.len(), 1);
    let r = &result.rejected_pieces[0];
    assert_eq!(r.piece_id, "top");
    assert_eq!((r.width, r.height), (1.2, 1.2));
    assert_eq!(r.reason, RejectReason::OversizedPiece);
}

#[test]
fn linear_stock_rounds_up() {
    let outcome = pack_material(
        &PackRequest {
            material: Material::linear("tube 1\"", 3.0),
            pieces: vec![PieceRequest::linear("leg", 1.0, 4)],
        },
        &PackOptions::default(),
    )
    .unwrap();
    let result = outcome.as_linear().unwrap();
    assert_eq!(result.total_length, 4.0);
    assert_eq!(result.units_needed, 2);
}

#[test]
fn linear_zero_stock_is_an_error() {
    for length in [0.0, -3.0] {
        let err = pack_material(
            &PackRequest {
                material: Material::linear("tube", length),
                pieces: vec![PieceRequest::linear("leg", 1.0, 4)],
            },
            &PackOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidMaterial { .. }));
    }
}

#[test]
fn grained_material_never_rotates_for_density() {
    let pieces = vec![
        PieceRequest::new("side", 0.6, 1.0, 2),
        PieceRequest::new("rail", 1.0, 0.3, 4),
        PieceRequest::new("shelf", 0.35, 0.45, 6),
    ];
    let result = pack_sheet(Material::sheet("Oak", 1.0, 1.0).with_rotation(false), pieces);
    for bin in &result.bins {
        assert_bin_valid(bin);
        assert!(bin.placements.iter().all(|p| !p.rotated));
    }
    let placed: usize = result.bins.iter().map(|b| b.placements.len()).sum();
    assert_eq!(placed, 12);
}

#[test]
fn quotes_share_sheets_per_material() {
    let plan = PlanRequest {
        materials: vec![
            Material::sheet("Melamine white", 1.83, 2.6),
            Material::linear("Tube 20x20", 6.0),
        ],
        quotes: vec![
            Quote {
                name: "wardrobe".into(),
                pieces: vec![
                    PieceRequest::new("side", 0.55, 2.4, 2).with_material("Melamine white"),
                    PieceRequest::new("shelf", 0.9, 0.55, 4).with_material("Melamine white"),
                    PieceRequest::linear("hanger", 0.9, 1).with_material("Tube 20x20"),
                ],
            },
            Quote {
                name: "desk".into(),
                pieces: vec![
                    PieceRequest::new("top", 1.2, 0.6, 1).with_material("Melamine white"),
                    PieceRequest::linear("leg", 0.72, 4).with_material("Tube 20x20"),
                    PieceRequest::new("drawer", 0.4, 0.4, 1).with_material("Walnut"),
                ],
            },
        ],
    };

    let reports = plan_quotes(&plan, &PackOptions::default());
    let names: Vec<_> = reports.iter().map(|r| r.material.as_str()).collect();
    assert_eq!(names, ["Melamine white", "Tube 20x20", "Walnut"]);

    let sheets = reports[0].outcome.as_ref().unwrap().as_sheet().unwrap();
    let placed: Vec<_> = sheets
        .bins
        .iter()
        .flat_map(|b| &b.placements)
        .map(|p| p.piece_id.as_str())
        .collect();
    assert_eq!(placed.len(), 7);
    assert_eq!(placed.iter().filter(|id| **id == "top").count(), 1);
    sheets.bins.iter().for_each(assert_bin_valid);

    let tube = reports[1].outcome.as_ref().unwrap().as_linear().unwrap();
    assert!((tube.total_length - 3.78).abs() < 1e-9);
    assert_eq!(tube.units_needed, 1);

    assert!(matches!(
        reports[2].outcome,
        Err(Error::MissingMaterialData { ref material }) if material == "Walnut"
    ));
}

#[test]
fn budget_fails_closed() {
    let options = PackOptions {
        max_pieces: Some(100),
        ..PackOptions::default()
    };
    let requests = vec![
        PackRequest {
            material: Material::sheet("MDF", 2.44, 1.83),
            pieces: vec![PieceRequest::new("chip", 0.01, 0.01, 101)],
        },
        PackRequest {
            material: Material::sheet("MDF 2", 2.44, 1.83),
            pieces: vec![PieceRequest::new("chip", 0.01, 0.01, 100)],
        },
    ];
    let reports = pack_batch(&requests, &options);
    assert_eq!(
        reports[0].outcome,
        Err(Error::BudgetExceeded {
            pieces: 101,
            limit: 100
        })
    );
    assert!(reports[1].outcome.is_ok());
}

#[test]
fn repeated_runs_are_identical() {
    let request = PackRequest {
        material: Material::sheet("MDF", 2.44, 1.83),
        pieces: vec![
            PieceRequest::new("a", 0.8, 0.6, 5),
            PieceRequest::new("b", 0.4, 0.3, 8),
            PieceRequest::new("c", 1.2, 0.6, 3),
            PieceRequest::new("d", 2.0, 0.3, 2),
        ],
    };
    let first = pack_material(&request, &PackOptions::default()).unwrap();
    let second = pack_material(&request, &PackOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
