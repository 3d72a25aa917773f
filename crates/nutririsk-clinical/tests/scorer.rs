use nutririsk_clinical::energy::estimated_energy_need;
use nutririsk_clinical::metadata::scoring_metadata;
use nutririsk_clinical::{ClinicalDomain, score_subject};
use nutririsk_core::RiskLabel;
use nutririsk_core::models::subject::{Sex, SubjectRecord};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn partial_record_renormalizes_over_known_domains() {
    let record = SubjectRecord {
        bmi: Some(37.0),
        systolic_bp: Some(170.0),
        diastolic_bp: Some(105.0),
        ..SubjectRecord::new("1")
    };

    let assessment = score_subject(&record);
    assert_eq!(assessment.weight_considered, 45.0);
    assert_eq!(assessment.domains.len(), 2);
    assert_eq!(
        assessment.domain(ClinicalDomain::Anthropometric).unwrap().points,
        16.0
    );
    assert_eq!(
        assessment.domain(ClinicalDomain::Hemodynamic).unwrap().points,
        20.0
    );
    assert!(close(assessment.score.unwrap(), 80.0));
    assert_eq!(assessment.label, Some(RiskLabel::Alto));
}

#[test]
fn empty_record_is_insufficient_data_not_healthy() {
    let assessment = score_subject(&SubjectRecord::new("2"));
    assert_eq!(assessment.score, None);
    assert_eq!(assessment.label, None);
    assert!(!assessment.has_sufficient_data());
    assert!(assessment.domains.is_empty());
}

#[test]
fn healthy_full_record_scores_zero() {
    let record = SubjectRecord {
        age_years: Some(30.0),
        sex: Some(Sex::Female),
        height_cm: Some(165.0),
        weight_kg: Some(58.0),
        systolic_bp: Some(110.0),
        diastolic_bp: Some(70.0),
        glucose: Some(85.0),
        hdl: Some(60.0),
        ldl: Some(100.0),
        triglycerides: Some(90.0),
        energy_kcal: Some(1800.0),
        protein_g: Some(80.0),
        carb_g: Some(240.0),
        fat_g: Some(55.0),
        sugar_g: Some(30.0),
        fiber_g: Some(30.0),
        smoker: Some(false),
        activity_days: Some(5.0),
        ..SubjectRecord::new("3")
    };

    let assessment = score_subject(&record);
    assert_eq!(assessment.weight_considered, 100.0);
    assert_eq!(assessment.score, Some(0.0));
    assert_eq!(assessment.label, Some(RiskLabel::Saludable));
}

#[test]
fn bmi_tiers() {
    let points = |bmi: f64| {
        let record = SubjectRecord {
            bmi: Some(bmi),
            ..SubjectRecord::new("x")
        };
        ClinicalDomain::Anthropometric.points(&record).unwrap()
    };
    assert_eq!(points(41.0), 20.0);
    assert_eq!(points(35.0), 16.0);
    assert_eq!(points(30.0), 12.0);
    assert_eq!(points(27.0), 6.0);
    assert_eq!(points(22.0), 0.0);
}

#[test]
fn diastolic_alone_can_trigger_hypertension() {
    let record = SubjectRecord {
        diastolic_bp: Some(95.0),
        ..SubjectRecord::new("x")
    };
    assert_eq!(ClinicalDomain::Hemodynamic.points(&record), Some(20.0));

    let elevated = SubjectRecord {
        systolic_bp: Some(125.0),
        diastolic_bp: Some(75.0),
        ..SubjectRecord::new("x")
    };
    assert_eq!(ClinicalDomain::Hemodynamic.points(&elevated), Some(5.0));
}

#[test]
fn pressure_cut_points_are_inclusive() {
    let points = |systolic: Option<f64>, diastolic: Option<f64>| {
        let record = SubjectRecord {
            systolic_bp: systolic,
            diastolic_bp: diastolic,
            ..SubjectRecord::new("x")
        };
        ClinicalDomain::Hemodynamic.points(&record).unwrap()
    };

    assert_eq!(points(Some(180.0), None), 25.0);
    assert_eq!(points(None, Some(120.0)), 25.0);
    assert_eq!(points(Some(179.0), Some(119.0)), 20.0);
    assert_eq!(points(Some(140.0), None), 20.0);
    assert_eq!(points(Some(130.0), None), 12.5);
    assert_eq!(points(None, Some(80.0)), 12.5);
    assert_eq!(points(Some(129.0), Some(79.0)), 5.0);
    assert_eq!(points(Some(120.0), None), 5.0);
    assert_eq!(points(Some(119.0), None), 0.0);
    assert_eq!(points(None, Some(79.0)), 0.0);
}

#[test]
fn lab_cut_points_are_inclusive() {
    let glucose = |value| SubjectRecord {
        glucose: Some(value),
        ..SubjectRecord::new("x")
    };
    let ldl = |value| SubjectRecord {
        ldl: Some(value),
        ..SubjectRecord::new("x")
    };
    let triglycerides = |value| SubjectRecord {
        triglycerides: Some(value),
        ..SubjectRecord::new("x")
    };
    let points = |record: SubjectRecord| ClinicalDomain::Metabolic.points(&record).unwrap();

    assert!(close(points(glucose(126.0)), 7.5));
    assert!(close(points(glucose(125.9)), 3.75));
    assert!(close(points(glucose(100.0)), 3.75));
    assert!(close(points(glucose(99.9)), 0.0));

    assert!(close(points(ldl(190.0)), 7.5));
    assert!(close(points(ldl(160.0)), 6.0));
    assert!(close(points(ldl(159.9)), 3.0));
    assert!(close(points(ldl(130.0)), 3.0));
    assert!(close(points(ldl(129.9)), 0.0));

    assert!(close(points(triglycerides(500.0)), 7.5));
    assert!(close(points(triglycerides(499.9)), 4.5));
    assert!(close(points(triglycerides(200.0)), 4.5));
    assert!(close(points(triglycerides(150.0)), 2.25));
    assert!(close(points(triglycerides(149.9)), 0.0));
}

#[test]
fn caloric_excess_needs_intake_strictly_above_the_ratio() {
    // Mifflin-St Jeor gives 1600 kcal basal for this body, 2560 kcal/day need.
    let record = |kcal| SubjectRecord {
        sex: Some(Sex::Male),
        age_years: Some(39.75),
        weight_kg: Some(70.0),
        height_cm: Some(175.0),
        energy_kcal: Some(kcal),
        ..SubjectRecord::new("x")
    };
    assert!(close(estimated_energy_need(&record(2000.0)).unwrap(), 2560.0));
    let points = |kcal| ClinicalDomain::Nutritional.points(&record(kcal)).unwrap();

    assert!(close(points(2560.0), 0.0));
    assert!(close(points(2816.0), 0.0));
    assert!(close(points(3072.0), 2.0));
    assert!(close(points(3328.0), 2.0));
    assert!(close(points(3353.6), 4.0));
}

#[test]
fn sugar_penalty_scales_to_a_cap() {
    // No age or sex, so only the sugar share contributes.
    let points = |sugar_g| {
        let record = SubjectRecord {
            energy_kcal: Some(2000.0),
            sugar_g: Some(sugar_g),
            ..SubjectRecord::new("x")
        };
        ClinicalDomain::Nutritional.points(&record).unwrap()
    };

    // 4 kcal/g over 2000 kcal: 5 g per percentage point.
    assert!(close(points(50.0), 0.0));
    assert!(close(points(75.0), 1.25));
    assert!(close(points(100.0), 2.5));
    assert!(close(points(150.0), 2.5));
}

#[test]
fn hdl_threshold_depends_on_sex() {
    let record = |sex| SubjectRecord {
        sex: Some(sex),
        hdl: Some(45.0),
        ..SubjectRecord::new("x")
    };
    assert_eq!(ClinicalDomain::Metabolic.points(&record(Sex::Male)), Some(0.0));
    assert_eq!(
        ClinicalDomain::Metabolic.points(&record(Sex::Female)),
        Some(6.0)
    );
}

#[test]
fn metabolic_sub_factors_add_up() {
    let record = SubjectRecord {
        sex: Some(Sex::Male),
        glucose: Some(110.0),
        hdl: Some(35.0),
        ldl: Some(195.0),
        triglycerides: Some(220.0),
        ..SubjectRecord::new("x")
    };
    // 7.5 × (0.5 + 0.8 + 1.0 + 0.6)
    let points = ClinicalDomain::Metabolic.points(&record).unwrap();
    assert!(close(points, 21.75));
}

#[test]
fn behavioral_smoker_with_low_activity() {
    let record = SubjectRecord {
        smoker: Some(true),
        activity_days: Some(1.0),
        ..SubjectRecord::new("x")
    };
    assert_eq!(ClinicalDomain::Behavioral.points(&record), Some(9.0));

    let some_activity = SubjectRecord {
        smoker: Some(false),
        activity_days: Some(2.0),
        ..SubjectRecord::new("x")
    };
    assert_eq!(ClinicalDomain::Behavioral.points(&some_activity), Some(2.0));
}

#[test]
fn nutritional_penalties() {
    // Male, 40 y, 80 kg, 180 cm: BMR = 800 + 1125 - 200 + 5 = 1730, need = 2768.
    let record = SubjectRecord {
        age_years: Some(40.0),
        sex: Some(Sex::Male),
        height_cm: Some(180.0),
        weight_kg: Some(80.0),
        energy_kcal: Some(4000.0),
        protein_g: Some(100.0),
        carb_g: Some(750.0),
        fat_g: Some(40.0),
        sugar_g: Some(150.0),
        fiber_g: Some(15.0),
        ..SubjectRecord::new("x")
    };
    assert!(close(estimated_energy_need(&record).unwrap(), 2768.0));

    // caloric 4.0 (ratio 1.45), macros: carb 75% and fat 9% out of band → 10/3,
    // sugar 15% → 1.25, fiber 15 < 19 → 2.5
    let points = ClinicalDomain::Nutritional.points(&record).unwrap();
    assert!(close(points, 4.0 + 10.0 / 3.0 + 1.25 + 2.5));
}

#[test]
fn nutritional_domain_needs_calories_or_fiber() {
    let record = SubjectRecord {
        protein_g: Some(100.0),
        sugar_g: Some(200.0),
        ..SubjectRecord::new("x")
    };
    assert_eq!(ClinicalDomain::Nutritional.points(&record), None);

    let fiber_only = SubjectRecord {
        fiber_g: Some(20.0),
        ..SubjectRecord::new("x")
    };
    assert_eq!(
        ClinicalDomain::Nutritional.points(&fiber_only),
        Some(1.25)
    );
}

#[test]
fn metadata_matches_scorer_weights() {
    let metadata = scoring_metadata();
    assert_eq!(metadata.total_weight(), 100.0);
    assert_eq!(metadata.saludable_max, 25.0);
    assert_eq!(metadata.moderado_max, 55.0);
    for domain in ClinicalDomain::ALL {
        let described = metadata.domain(domain).unwrap();
        assert_eq!(described.weight, domain.weight());
        let sub_weights: f64 = described.factors.iter().map(|f| f.sub_weight).sum();
        assert!(close(sub_weights, domain.weight()), "{}", domain.name());
    }
}

#[test]
fn metadata_serializes() {
    let json = serde_json::to_value(scoring_metadata()).unwrap();
    assert_eq!(json["domains"][0]["domain"], "anthropometric");
    assert_eq!(json["domains"][0]["factors"][0]["rules"][0], "BMI >= 40: 100%");
}

fn optional(range: std::ops::Range<f64>) -> impl Strategy<Value = Option<f64>> {
    prop::option::of(range)
}

proptest! {
    #[test]
    fn score_is_bounded_when_defined(
        bmi in optional(10.0..70.0),
        sbp in optional(80.0..240.0),
        glucose in optional(50.0..400.0),
        tg in optional(30.0..900.0),
        kcal in optional(0.0..6000.0),
        sugar in optional(0.0..400.0),
        fiber in optional(0.0..80.0),
        smoker in prop::option::of(any::<bool>()),
    ) {
        let record = SubjectRecord {
            bmi,
            systolic_bp: sbp,
            glucose,
            triglycerides: tg,
            energy_kcal: kcal,
            sugar_g: sugar,
            fiber_g: fiber,
            smoker,
            ..SubjectRecord::new("p")
        };
        let assessment = score_subject(&record);
        match assessment.score {
            Some(score) => {
                prop_assert!((0.0..=100.0).contains(&score));
                prop_assert!(assessment.weight_considered > 0.0);
            }
            None => prop_assert!(assessment.domains.is_empty()),
        }
    }
}
