//! Built-in case bank and reasoning rubrics.
//!
//! These guarantee the trainer is usable without an external case bank. Config-supplied
//! cases are added on top (see `config::CaseCfg`).

use std::collections::{BTreeMap, HashMap};

use crate::domain::{Case, CaseOption, Metrics, ReasoningCheck};

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

fn options(items: &[(&str, &str)]) -> Vec<CaseOption> {
  items
    .iter()
    .map(|(id, label)| CaseOption { id: id.to_string(), label: label.to_string() })
    .collect()
}

fn rationale(items: &[(&str, &str)]) -> BTreeMap<String, String> {
  items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn check(label: &str, keywords: &[&str], hit: &str, miss: &str) -> ReasoningCheck {
  ReasoningCheck {
    label: label.into(),
    keywords: strings(keywords),
    hit_feedback: hit.into(),
    miss_feedback: miss.into(),
  }
}

pub fn seed_cases() -> Vec<Case> {
  vec![
    Case {
      id: 1,
      patient_stem_short: "62 y/o male".into(),
      background_country: Some("United States".into()),
      background_flag: Some("🇺🇸".into()),
      metrics: Metrics { a1c: "8.2%".into(), egfr: "75 mL/min".into(), bmi: "34 kg/m²".into() },
      comorbidities: strings(&["Heart failure (HFrEF)", "Hypertension"]),
      current_meds: strings(&["Metformin 1000 mg BID"]),
      options: options(&[
        ("A", "Empagliflozin"),
        ("B", "Glipizide"),
        ("C", "Pioglitazone"),
        ("D", "Sitagliptin"),
        ("E", "Insulin glargine"),
      ]),
      correct_option_id: "A".into(),
      why_correct: strings(&[
        "SGLT2 inhibitors reduce HF hospitalization (EMPEROR-Reduced trial).",
        "Empagliflozin has proven cardiovascular benefit in T2DM with HFrEF.",
        "Additional A1C lowering of ~0.5–0.8% with weight and BP reduction.",
      ]),
      avoid_list: strings(&[
        "Pioglitazone – contraindicated in heart failure (fluid retention).",
      ]),
      guidelines: strings(&[
        "ADA 2024 Standards of Care §9: SGLT2i preferred with HFrEF.",
        "ESC 2023 Heart Failure Guidelines: Dapagliflozin/empagliflozin class I recommendation.",
      ]),
      incorrect_rationale: rationale(&[
        ("B", "Glipizide increases hypoglycemia risk without cardiovascular benefit in HFrEF."),
        ("C", "Pioglitazone causes fluid retention and is contraindicated in heart failure."),
        ("D", "Sitagliptin is weight-neutral but lacks proven CV or HF benefit."),
        ("E", "Insulin glargine adds weight gain risk; not first-line add-on with HFrEF."),
      ]),
    },
    Case {
      id: 2,
      patient_stem_short: "55 y/o female".into(),
      background_country: Some("Mexico".into()),
      background_flag: Some("🇲🇽".into()),
      metrics: Metrics { a1c: "9.1%".into(), egfr: "90 mL/min".into(), bmi: "31 kg/m²".into() },
      comorbidities: strings(&["ASCVD (prior MI)", "Dyslipidemia"]),
      current_meds: strings(&["Metformin 1000 mg BID", "Atorvastatin 40 mg"]),
      options: options(&[
        ("A", "Semaglutide"),
        ("B", "Canagliflozin"),
        ("C", "Glimepiride"),
        ("D", "Saxagliptin"),
        ("E", "Acarbose"),
      ]),
      correct_option_id: "A".into(),
      why_correct: strings(&[
        "GLP-1 RAs reduce MACE in patients with established ASCVD (SUSTAIN-6).",
        "Semaglutide provides superior A1C reduction (~1.5%).",
        "Additional weight loss benefit (~5–10%) beneficial with BMI 31.",
      ]),
      avoid_list: strings(&[
        "Saxagliptin – associated with increased HF hospitalization (SAVOR-TIMI).",
      ]),
      guidelines: strings(&[
        "ADA 2024 §9: GLP-1 RA preferred with established ASCVD.",
        "ACC/AHA 2023: GLP-1 RA class I for T2DM + ASCVD.",
      ]),
      incorrect_rationale: rationale(&[
        ("B", "Canagliflozin has CV benefit but GLP-1 RA is preferred for established ASCVD with high A1C."),
        ("C", "Glimepiride lacks cardiovascular benefit and increases hypoglycemia risk."),
        ("D", "Saxagliptin is associated with increased HF hospitalization (SAVOR-TIMI)."),
        ("E", "Acarbose has minimal A1C reduction and no proven CV benefit in ASCVD."),
      ]),
    },
    Case {
      id: 3,
      patient_stem_short: "70 y/o male".into(),
      background_country: Some("India".into()),
      background_flag: Some("🇮🇳".into()),
      metrics: Metrics { a1c: "7.8%".into(), egfr: "28 mL/min".into(), bmi: "27 kg/m²".into() },
      comorbidities: strings(&["CKD Stage 4", "Hypertension"]),
      current_meds: strings(&["Insulin glargine 20 units", "Lisinopril 20 mg"]),
      options: options(&[
        ("A", "Metformin"),
        ("B", "Linagliptin"),
        ("C", "Canagliflozin"),
        ("D", "Exenatide"),
        ("E", "Glipizide"),
      ]),
      correct_option_id: "B".into(),
      why_correct: strings(&[
        "Linagliptin requires no renal dose adjustment (hepatic elimination).",
        "Safe in CKD Stage 4 (eGFR < 30) unlike most other agents.",
        "Modest A1C reduction (~0.5–0.7%) with low hypoglycemia risk.",
      ]),
      avoid_list: strings(&[
        "Metformin – contraindicated with eGFR < 30 (lactic acidosis risk).",
        "Canagliflozin – limited efficacy when eGFR < 30 for glycemic control.",
      ]),
      guidelines: strings(&[
        "ADA 2024 §11: DPP-4i safe across CKD stages; linagliptin no adjustment.",
        "KDIGO 2022: Avoid metformin when eGFR < 30.",
      ]),
      incorrect_rationale: rationale(&[
        ("A", "Metformin is contraindicated with eGFR < 30 due to lactic acidosis risk."),
        ("C", "Canagliflozin has limited glycemic efficacy when eGFR < 30."),
        ("D", "Exenatide requires renal dose adjustment and is not recommended in CKD Stage 4."),
        ("E", "Glipizide is usable but carries higher hypoglycemia risk in CKD."),
      ]),
    },
    Case {
      id: 4,
      patient_stem_short: "48 y/o female".into(),
      background_country: Some("United Kingdom".into()),
      background_flag: Some("🇬🇧".into()),
      metrics: Metrics { a1c: "7.5%".into(), egfr: "95 mL/min".into(), bmi: "42 kg/m²".into() },
      comorbidities: strings(&["Obesity", "Obstructive sleep apnea"]),
      current_meds: strings(&["Metformin 1000 mg BID"]),
      options: options(&[
        ("A", "Tirzepatide"),
        ("B", "Glipizide"),
        ("C", "Pioglitazone"),
        ("D", "Insulin NPH"),
        ("E", "Sitagliptin"),
      ]),
      correct_option_id: "A".into(),
      why_correct: strings(&[
        "Tirzepatide (dual GIP/GLP-1 RA) provides greatest weight loss (~15–20%).",
        "SURPASS trials showed superior A1C reduction vs all comparators.",
        "Weight reduction can improve obstructive sleep apnea.",
      ]),
      avoid_list: strings(&[
        "Pioglitazone – weight gain contraproductive with BMI 42.",
        "Insulin NPH – weight gain and hypoglycemia risk; not first add-on here.",
      ]),
      guidelines: strings(&[
        "ADA 2024 §8: Prioritize agents with weight loss when obesity is present.",
        "Endocrine Society 2023: GLP-1 RA/dual agonists first-line for T2DM + obesity.",
      ]),
      incorrect_rationale: rationale(&[
        ("B", "Glipizide causes weight gain and lacks weight-loss benefit needed at BMI 42."),
        ("C", "Pioglitazone causes significant weight gain — counterproductive with severe obesity."),
        ("D", "Insulin NPH promotes weight gain and hypoglycemia; not optimal as first add-on here."),
        ("E", "Sitagliptin is weight-neutral but provides inferior A1C reduction and no weight loss."),
      ]),
    },
    Case {
      id: 5,
      patient_stem_short: "65 y/o male".into(),
      background_country: Some("Nigeria".into()),
      background_flag: Some("🇳🇬".into()),
      metrics: Metrics { a1c: "8.8%".into(), egfr: "60 mL/min".into(), bmi: "29 kg/m²".into() },
      comorbidities: strings(&["Diabetic kidney disease (albuminuria)", "Hypertension"]),
      current_meds: strings(&["Metformin 500 mg BID", "Losartan 100 mg"]),
      options: options(&[
        ("A", "Dapagliflozin"),
        ("B", "Glimepiride"),
        ("C", "Sitagliptin"),
        ("D", "Pioglitazone"),
        ("E", "Insulin lispro"),
      ]),
      correct_option_id: "A".into(),
      why_correct: strings(&[
        "SGLT2i slow CKD progression and reduce albuminuria (DAPA-CKD trial).",
        "Dapagliflozin has dedicated kidney outcome data regardless of diabetes.",
        "Additional A1C, weight, and blood pressure benefits.",
      ]),
      avoid_list: vec![],
      guidelines: strings(&[
        "ADA 2024 §11: SGLT2i recommended for DKD with albuminuria.",
        "KDIGO 2022: SGLT2i first-line for CKD with albuminuria in T2DM.",
      ]),
      incorrect_rationale: rationale(&[
        ("B", "Glimepiride lacks renal protective effects and increases hypoglycemia risk."),
        ("C", "Sitagliptin is safe but does not slow CKD progression or reduce albuminuria."),
        ("D", "Pioglitazone causes fluid retention and lacks kidney-specific outcome data."),
        ("E", "Insulin lispro addresses glycemia but provides no renal protection benefit."),
      ]),
    },
    Case {
      id: 6,
      patient_stem_short: "58 y/o female".into(),
      background_country: Some("Philippines".into()),
      background_flag: Some("🇵🇭".into()),
      metrics: Metrics { a1c: "10.5%".into(), egfr: "85 mL/min".into(), bmi: "26 kg/m²".into() },
      comorbidities: strings(&["Symptomatic hyperglycemia (polyuria, weight loss)"]),
      current_meds: strings(&["Metformin 1000 mg BID"]),
      options: options(&[
        ("A", "Sitagliptin"),
        ("B", "Insulin glargine + lispro"),
        ("C", "Pioglitazone"),
        ("D", "Canagliflozin"),
        ("E", "Glipizide"),
      ]),
      correct_option_id: "B".into(),
      why_correct: strings(&[
        "A1C ≥ 10% with symptoms → initiate insulin to rapidly control glucose.",
        "Basal-bolus (glargine + lispro) addresses fasting and prandial hyperglycemia.",
        "Oral agents alone unlikely to achieve adequate control at this A1C level.",
      ]),
      avoid_list: vec![],
      guidelines: strings(&[
        "ADA 2024 §9: Consider insulin if A1C ≥ 10% or symptomatic hyperglycemia.",
        "AACE 2023: Insulin recommended when A1C > 9% with symptoms.",
      ]),
      incorrect_rationale: rationale(&[
        ("A", "Sitagliptin provides modest A1C reduction (~0.5–0.7%); insufficient at A1C 10.5%."),
        ("C", "Pioglitazone is too slow-acting to address symptomatic hyperglycemia acutely."),
        ("D", "Canagliflozin alone cannot achieve adequate control at this A1C level."),
        ("E", "Glipizide has limited efficacy ceiling; inadequate for A1C ≥ 10% with symptoms."),
      ]),
    },
    Case {
      id: 7,
      patient_stem_short: "72 y/o male".into(),
      background_country: Some("Japan".into()),
      background_flag: Some("🇯🇵".into()),
      metrics: Metrics { a1c: "7.2%".into(), egfr: "55 mL/min".into(), bmi: "24 kg/m²".into() },
      comorbidities: strings(&["Recurrent hypoglycemia", "Frailty"]),
      current_meds: strings(&["Glimepiride 4 mg", "Metformin 500 mg BID"]),
      options: options(&[
        ("A", "Add insulin glargine"),
        ("B", "Switch glimepiride to linagliptin"),
        ("C", "Add empagliflozin"),
        ("D", "Add pioglitazone"),
        ("E", "Increase glimepiride to 8 mg"),
      ]),
      correct_option_id: "B".into(),
      why_correct: strings(&[
        "Replace sulfonylurea (cause of hypoglycemia) with safer DPP-4i.",
        "Linagliptin: minimal hypoglycemia risk, no renal adjustment needed.",
        "A1C 7.2% in frail elderly — less intensive target appropriate (~7.5–8%).",
      ]),
      avoid_list: strings(&[
        "Increasing glimepiride – would worsen hypoglycemia in frail patient.",
      ]),
      guidelines: strings(&[
        "ADA 2024 §13: Relaxed A1C targets in elderly/frail; avoid hypoglycemia.",
        "Beers Criteria: Avoid long-acting sulfonylureas in elderly.",
      ]),
      incorrect_rationale: rationale(&[
        ("A", "Adding insulin glargine increases hypoglycemia risk in a frail elderly patient."),
        ("C", "Empagliflozin is reasonable but doesn't address the root cause — the sulfonylurea."),
        ("D", "Pioglitazone causes fluid retention and fracture risk in elderly patients."),
        ("E", "Increasing glimepiride would directly worsen the recurrent hypoglycemia."),
      ]),
    },
    Case {
      id: 8,
      patient_stem_short: "45 y/o female".into(),
      background_country: Some("Brazil".into()),
      background_flag: Some("🇧🇷".into()),
      metrics: Metrics { a1c: "7.9%".into(), egfr: "110 mL/min".into(), bmi: "38 kg/m²".into() },
      comorbidities: strings(&["PCOS", "NAFLD"]),
      current_meds: strings(&["Metformin 1000 mg BID"]),
      options: options(&[
        ("A", "Liraglutide"),
        ("B", "Glipizide"),
        ("C", "Insulin detemir"),
        ("D", "Acarbose"),
        ("E", "Rosiglitazone"),
      ]),
      correct_option_id: "A".into(),
      why_correct: strings(&[
        "GLP-1 RA provides weight loss beneficial for PCOS and NAFLD.",
        "Liraglutide has shown improvement in hepatic steatosis markers.",
        "Strong A1C reduction (~1.0–1.5%) without hypoglycemia risk.",
      ]),
      avoid_list: strings(&[
        "Rosiglitazone – limited use due to cardiovascular concerns.",
      ]),
      guidelines: strings(&[
        "ADA 2024 §8: GLP-1 RA preferred when weight management is priority.",
        "AASLD 2023: Weight loss is primary intervention for NAFLD.",
      ]),
      incorrect_rationale: rationale(&[
        ("B", "Glipizide causes weight gain — counterproductive for PCOS and NAFLD."),
        ("C", "Insulin detemir promotes weight gain; not first-line add-on with BMI 38."),
        ("D", "Acarbose has modest A1C effect and poor tolerability; doesn't address weight or NAFLD."),
        ("E", "Rosiglitazone has limited use due to cardiovascular safety concerns."),
      ]),
    },
    Case {
      id: 9,
      patient_stem_short: "60 y/o male".into(),
      background_country: Some("Germany".into()),
      background_flag: Some("🇩🇪".into()),
      metrics: Metrics { a1c: "8.5%".into(), egfr: "45 mL/min".into(), bmi: "30 kg/m²".into() },
      comorbidities: strings(&["CKD Stage 3b", "Heart failure (HFpEF)"]),
      current_meds: strings(&["Metformin 500 mg BID", "Lisinopril 10 mg"]),
      options: options(&[
        ("A", "Empagliflozin"),
        ("B", "Pioglitazone"),
        ("C", "Glimepiride"),
        ("D", "Exenatide"),
        ("E", "Saxagliptin"),
      ]),
      correct_option_id: "A".into(),
      why_correct: strings(&[
        "SGLT2i benefits both HFpEF (EMPEROR-Preserved) and CKD progression.",
        "Empagliflozin effective for glycemic control down to eGFR 20.",
        "Dual cardiorenal protection makes it ideal for this combination.",
      ]),
      avoid_list: strings(&[
        "Pioglitazone – contraindicated in heart failure.",
        "Saxagliptin – HF risk signal (SAVOR-TIMI 53).",
      ]),
      guidelines: strings(&[
        "ADA 2024 §9/11: SGLT2i for T2DM with HF and/or CKD.",
        "ESC 2023: SGLT2i class I for HFpEF regardless of diabetes status.",
      ]),
      incorrect_rationale: rationale(&[
        ("B", "Pioglitazone is contraindicated in heart failure due to fluid retention."),
        ("C", "Glimepiride lacks cardiorenal benefit and increases hypoglycemia risk."),
        ("D", "Exenatide requires renal adjustment and lacks HFpEF outcome data."),
        ("E", "Saxagliptin has a heart failure risk signal from SAVOR-TIMI 53."),
      ]),
    },
    Case {
      id: 10,
      patient_stem_short: "52 y/o female".into(),
      background_country: Some("South Korea".into()),
      background_flag: Some("🇰🇷".into()),
      metrics: Metrics { a1c: "8.0%".into(), egfr: "100 mL/min".into(), bmi: "33 kg/m²".into() },
      comorbidities: strings(&["Recurrent UTIs", "Osteoporosis"]),
      current_meds: strings(&["Metformin 1000 mg BID"]),
      options: options(&[
        ("A", "Dapagliflozin"),
        ("B", "Dulaglutide"),
        ("C", "Canagliflozin"),
        ("D", "Pioglitazone"),
        ("E", "Glipizide"),
      ]),
      correct_option_id: "B".into(),
      why_correct: strings(&[
        "GLP-1 RA avoids genital/urinary infection risk seen with SGLT2i.",
        "Dulaglutide: weekly injection, strong A1C reduction, weight loss.",
        "No bone fracture risk (unlike canagliflozin and pioglitazone).",
      ]),
      avoid_list: strings(&[
        "Canagliflozin – fracture risk + UTI exacerbation.",
        "Pioglitazone – associated with increased fracture risk.",
      ]),
      guidelines: strings(&[
        "ADA 2024 §9: Consider side-effect profile when choosing agent.",
        "FDA labeling: Canagliflozin carries bone fracture warning.",
      ]),
      incorrect_rationale: rationale(&[
        ("A", "Dapagliflozin (SGLT2i) increases genital/urinary infection risk with recurrent UTIs."),
        ("C", "Canagliflozin carries both UTI exacerbation risk and bone fracture warnings."),
        ("D", "Pioglitazone increases fracture risk — problematic with existing osteoporosis."),
        ("E", "Glipizide causes weight gain and hypoglycemia without addressing key comorbidities."),
      ]),
    },
  ]
}

/// Reasoning rubrics keyed by case id.
pub fn seed_rubrics() -> HashMap<u32, Vec<ReasoningCheck>> {
  HashMap::from([
    (1, vec![
      check("Heart failure consideration", &["heart failure", "hfref", "hf"],
        "You identified heart failure as a key factor.",
        "Consider how heart failure influences drug choice."),
      check("SGLT2i mechanism", &["sglt2", "sodium-glucose", "empagliflozin"],
        "You referenced the SGLT2 inhibitor class.",
        "Mention the drug class and its mechanism."),
      check("Fluid retention risk", &["fluid", "retention", "pioglitazone", "contraindicated"],
        "You flagged fluid retention risk.",
        "Pioglitazone causes fluid retention — important to note."),
      check("CV benefit", &["cardiovascular", "cv benefit", "emperor", "cardio"],
        "You noted cardiovascular benefits.",
        "SGLT2i have proven CV outcome benefits in HFrEF."),
    ]),
    (2, vec![
      check("ASCVD history", &["ascvd", "cardiovascular", "mi", "myocardial"],
        "You identified ASCVD as the driver.",
        "Prior MI / ASCVD should guide drug selection."),
      check("GLP-1 RA class", &["glp-1", "glp1", "semaglutide", "incretin"],
        "You referenced GLP-1 receptor agonists.",
        "GLP-1 RAs are preferred with established ASCVD."),
      check("Weight benefit", &["weight", "bmi", "obesity"],
        "You considered weight management.",
        "Weight loss is an added benefit with BMI 31."),
    ]),
    (3, vec![
      check("Renal function", &["ckd", "renal", "egfr", "kidney"],
        "You identified CKD as the key constraint.",
        "eGFR 28 severely limits drug choices."),
      check("No renal adjustment", &["no adjustment", "hepatic", "linagliptin", "dpp-4"],
        "You noted linagliptin needs no renal dose change.",
        "Linagliptin is unique among DPP-4i — hepatic elimination."),
      check("Metformin contraindication", &["metformin", "lactic acidosis", "contraindicated"],
        "You flagged metformin risk at low eGFR.",
        "Metformin is contraindicated when eGFR < 30."),
    ]),
    (4, vec![
      check("Obesity focus", &["obesity", "weight", "bmi"],
        "You prioritized weight management.",
        "BMI 42 makes weight-lowering agents critical."),
      check("Dual agonist", &["tirzepatide", "dual", "gip", "glp"],
        "You identified the dual agonist mechanism.",
        "Tirzepatide's dual GIP/GLP-1 action provides superior weight loss."),
      check("Sleep apnea improvement", &["sleep apnea", "osa", "apnea"],
        "You linked weight loss to OSA improvement.",
        "Weight reduction can improve obstructive sleep apnea."),
    ]),
    (5, vec![
      check("Albuminuria / DKD", &["albumin", "dkd", "diabetic kidney", "proteinuria"],
        "You identified diabetic kidney disease.",
        "Albuminuria is a key indication for SGLT2i."),
      check("SGLT2i renal protection", &["sglt2", "dapa-ckd", "renal protection", "dapagliflozin"],
        "You referenced SGLT2i kidney benefits.",
        "DAPA-CKD showed SGLT2i slow CKD progression."),
      check("Blood pressure benefit", &["blood pressure", "hypertension", "bp"],
        "You noted BP-lowering benefit.",
        "SGLT2i also reduce blood pressure — relevant here."),
    ]),
    (6, vec![
      check("Severe hyperglycemia", &["a1c 10", "symptomatic", "polyuria", "severe"],
        "You recognized the severity of hyperglycemia.",
        "A1C ≥ 10% with symptoms warrants insulin."),
      check("Insulin indication", &["insulin", "basal", "bolus", "glargine"],
        "You identified insulin as necessary.",
        "Oral agents alone are insufficient at this A1C level."),
      check("Oral agent limitation", &["oral", "insufficient", "inadequate", "not enough"],
        "You noted oral agents are inadequate here.",
        "Consider why oral monotherapy fails at A1C ≥ 10%."),
    ]),
    (7, vec![
      check("Hypoglycemia risk", &["hypoglycemia", "hypo", "low blood sugar"],
        "You addressed the hypoglycemia concern.",
        "Recurrent hypoglycemia is the primary problem to solve."),
      check("Sulfonylurea removal", &["sulfonylurea", "glimepiride", "replace", "switch", "remove"],
        "You identified the sulfonylurea as the culprit.",
        "Glimepiride is causing the hypoglycemia — it should be replaced."),
      check("Frailty / elderly", &["frail", "elderly", "older", "age"],
        "You considered frailty in your reasoning.",
        "Frailty requires less aggressive glycemic targets."),
    ]),
    (8, vec![
      check("NAFLD consideration", &["nafld", "liver", "steatosis", "fatty liver"],
        "You considered NAFLD in drug choice.",
        "NAFLD benefits from weight loss — relevant for drug selection."),
      check("GLP-1 RA benefits", &["glp-1", "glp1", "liraglutide", "incretin"],
        "You referenced GLP-1 RA class benefits.",
        "GLP-1 RAs provide weight loss and hepatic benefits."),
      check("PCOS relevance", &["pcos", "polycystic"],
        "You linked PCOS to weight management.",
        "PCOS improves with weight reduction strategies."),
    ]),
    (9, vec![
      check("HFpEF", &["hfpef", "heart failure", "preserved", "hf"],
        "You identified HFpEF as a factor.",
        "HFpEF benefits from SGLT2i (EMPEROR-Preserved)."),
      check("CKD co-management", &["ckd", "renal", "kidney", "egfr"],
        "You noted the CKD co-management need.",
        "CKD Stage 3b adds cardiorenal protection value to SGLT2i."),
      check("Dual protection", &["dual", "cardiorenal", "both", "heart and kidney"],
        "You recognized dual cardiorenal benefit.",
        "SGLT2i uniquely protect both heart and kidneys."),
    ]),
    (10, vec![
      check("UTI risk avoidance", &["uti", "urinary", "infection", "genital"],
        "You flagged UTI risk with SGLT2i.",
        "Recurrent UTIs make SGLT2i risky — important consideration."),
      check("Fracture risk", &["fracture", "bone", "osteoporosis"],
        "You considered fracture/osteoporosis risk.",
        "Canagliflozin and pioglitazone increase fracture risk."),
      check("GLP-1 RA as alternative", &["glp-1", "glp1", "dulaglutide", "incretin"],
        "You chose GLP-1 RA to avoid these risks.",
        "GLP-1 RAs avoid both UTI and fracture concerns."),
    ]),
  ])
}
