use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polyalpha_analysis::{encipher, find_key_length, AnalysisConfig, CoincidenceEstimator, Language};

const PLAINTEXT: &str = "ALINGUAPORTUGUESAEUMADASMAISFALADASDOMUNDOEPOSSUIUMAHISTORIARICA\
    QUECOMECANAPENINSULAIBERICADURANTEAIDADEMEDIAQUANDOOLATIMFALADOPELOSPOVOSDAREGIAO\
    SETRANSFORMOULENTAMENTEEMDIVERSOSDIALETOSCOMOPASSARDOSSECULOSOPORTUGUESGANHOUFORMAP";

fn bench_key_length(c: &mut Criterion) {
    let language = Language::portuguese();
    let config = AnalysisConfig::default();
    let estimator = CoincidenceEstimator::new(&language, &config);
    let cipher = encipher(PLAINTEXT, &[2, 5, 1], &language.frequencies).unwrap();

    c.bench_function("find_key_length", |b| {
        b.iter(|| find_key_length(black_box(&cipher), &estimator, &config))
    });
}

criterion_group!(benches, bench_key_length);
criterion_main!(benches);
