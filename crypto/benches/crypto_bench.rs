use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn ecdsa_sign_bench(c: &mut Criterion) {
    let kp = dpos_crypto::keypair_from_passphrase("bench passphrase").unwrap();
    let hash = dpos_crypto::sha256(&[42u8; 128]);

    c.bench_function("ecdsa_sign_prehash", |b| {
        b.iter(|| dpos_crypto::sign_ecdsa(black_box(&hash), &kp.private))
    });
}

fn ecdsa_verify_bench(c: &mut Criterion) {
    let kp = dpos_crypto::keypair_from_passphrase("bench passphrase").unwrap();
    let hash = dpos_crypto::sha256(&[42u8; 128]);
    let sig = dpos_crypto::sign_ecdsa(&hash, &kp.private).unwrap();

    c.bench_function("ecdsa_verify_prehash", |b| {
        b.iter(|| dpos_crypto::verify_ecdsa(black_box(&hash), sig.as_bytes(), &kp.public))
    });
}

fn schnorr_verify_bench(c: &mut Criterion) {
    let kp = dpos_crypto::keypair_from_passphrase("bench passphrase").unwrap();
    let hash = dpos_crypto::sha256(&[42u8; 128]);
    let sig = dpos_crypto::sign_schnorr(&hash, &kp.private).unwrap();

    c.bench_function("schnorr_verify_prehash", |b| {
        b.iter(|| dpos_crypto::verify_schnorr(black_box(&hash), sig.as_bytes(), &kp.public))
    });
}

fn sha256_1kb_bench(c: &mut Criterion) {
    let data = vec![0xCDu8; 1024];

    c.bench_function("sha256_1KB", |b| {
        b.iter(|| dpos_crypto::sha256(black_box(&data)))
    });
}

fn address_bench(c: &mut Criterion) {
    let kp = dpos_crypto::keypair_from_passphrase("bench passphrase").unwrap();

    c.bench_function("address_from_public_key", |b| {
        b.iter(|| dpos_crypto::address_from_public_key(black_box(&kp.public), 30))
    });
}

criterion_group!(
    benches,
    ecdsa_sign_bench,
    ecdsa_verify_bench,
    schnorr_verify_bench,
    sha256_1kb_bench,
    address_bench
);
criterion_main!(benches);
