use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dpos_config::ConfigManager;
use dpos_transactions::deserializer::deserialize;
use dpos_transactions::{TransactionFactory, TypeRegistry};

const TRANSFER_V1: &str = "ff011e0055b6d70802a47a2f594635737d2ce9898680812ff7fa6aaa64ddea1360474c110e9985a08780f0fa020000000011636f6f6c2076656e646f72206669656c641027000000000000000000001e07917aa042bf600339e13ed57c5364a71eebb8c33044022013287e3d1713e1a407068af0054412dc523476a8786823b8744d2ba8a3daa144022059f30896ad610aecb145275bd89de58ddaeb7c703d31fdab2a02efa3ea4ae1bd";

fn bench_deserialize(c: &mut Criterion) {
    let types = TypeRegistry::new();
    let bytes = hex::decode(TRANSFER_V1).unwrap();
    c.bench_function("deserialize_transfer_v1", |b| {
        b.iter(|| deserialize(black_box(&bytes), &types).unwrap())
    });
}

fn bench_factory(c: &mut Criterion) {
    let config = ConfigManager::devnet();
    let types = TypeRegistry::new();
    let factory = TransactionFactory::new(&config, &types, 1);
    let bytes = hex::decode(TRANSFER_V1).unwrap();
    c.bench_function("from_bytes_transfer_v1", |b| {
        b.iter(|| factory.from_bytes(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_deserialize, bench_factory);
criterion_main!(benches);
