//! confidence のユースケース・配線テスト

mod relay_tests;
