//! identify のユースケース・配線テスト（ポートは手書きのフェイクで差し替える）
