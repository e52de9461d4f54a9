use std::collections::BTreeSet;
use std::fs;

use crime_dashboard::config::Settings;
use crime_dashboard::data::aggregate::{mean_rate_by_region, victim_totals, RegionRate};
use crime_dashboard::data::filter::{apply_filter, FilterSpec};
use crime_dashboard::data::source::DatasetSource;
use crime_dashboard::view::{render, Section, SectionView};

const CSV: &str = "\
provincia_nombre,anio,codigo_delito_snic_nombre,cantidad_hechos,tasa_hechos,cantidad_victimas_masc,cantidad_victimas_fem,cantidad_victimas_sd
RegionA,2019,Robo,10,50.0,5,3,0
RegionA,2020,Robo,20,70.0,8,2,1
RegionB,2019,Hurto,5,30.0,1,1,0
";

fn spec() -> FilterSpec {
    FilterSpec::new(
        BTreeSet::from(["RegionA".to_string()]),
        (2019, 2020),
        BTreeSet::from(["Robo".to_string()]),
        (0.0, 100.0),
    )
    .unwrap()
}

#[test]
fn load_filter_and_aggregate_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snic-provincias.csv");
    fs::write(&path, CSV).unwrap();

    let source = DatasetSource::open(&path).unwrap();
    let dataset = source.dataset();
    let view = apply_filter(&dataset, &spec());

    assert_eq!(view.len(), 2);
    assert!(view.iter().all(|r| r.region == "RegionA"));
    assert_eq!(
        mean_rate_by_region(&view),
        vec![RegionRate {
            region: "RegionA".to_string(),
            mean_rate: 60.0
        }]
    );

    let totals = victim_totals(&view);
    assert_eq!(
        (totals.male, totals.female, totals.undetermined),
        (13, 5, 1)
    );
}

#[test]
fn render_drives_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snic-provincias.csv");
    fs::write(&path, CSV).unwrap();
    let dataset = DatasetSource::open(&path).unwrap().dataset();

    for section in Section::ALL {
        let vm = render(&dataset, &spec(), section, &Settings::default());
        assert_eq!(vm.matched, 2, "{section:?}");
        match (section, &vm.content) {
            (Section::Introduction | Section::Conclusion, SectionView::Narrative(s)) => {
                assert_eq!(s.records, 3)
            }
            (Section::Geography, SectionView::MeanRates(r)) => assert_eq!(r.len(), 1),
            (Section::CrimeTypes, SectionView::Categories(c)) => {
                assert_eq!(c[0].category, "Robo");
                assert_eq!(c[0].count, 2);
            }
            (Section::Victims, SectionView::Victims(v)) => assert_eq!(v.total(), 19),
            (Section::Relationships, SectionView::Relationships(s)) => {
                assert_eq!(s[0].incidents, 30);
                assert_eq!(s[0].rate, 120.0);
            }
            (Section::Highlights, SectionView::Extremes(e)) => {
                // One province ranked: it is both the top and the bottom.
                assert_eq!(e.top, e.bottom);
            }
            (section, content) => panic!("unexpected {content:?} for {section:?}"),
        }
    }
}
