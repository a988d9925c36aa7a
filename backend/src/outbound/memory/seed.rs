//! Starter directory for runs without a database.

use crate::domain::Role;

/// One staff member per department, in id order.
pub(super) const STAFF: [(&str, &str, Role); 11] = [
    ("Ahmet Yılmaz", "mali.gmy@hastane.local", Role::MaliGmy),
    ("Ayşe Demir", "merkez.hakedis@hastane.local", Role::MerkezHakedis),
    ("Ali Veli", "ik@hastane.local", Role::InsanKaynaklari),
    ("Zeynep Yılmaz", "ruhsat@hastane.local", Role::Ruhsatlandirma),
    ("Hasan Hakkediş", "mali.isler@hastane.local", Role::MaliIsler),
    ("Ahmet Bilişim", "bilgi.sistemleri@hastane.local", Role::BilgiSistemleri),
    ("Fatma Misafir", "misafir@hastane.local", Role::MisafirHizmetleri),
    ("Tuncer Bio", "biyomedikal@hastane.local", Role::Biyomedikal),
    ("Osman Güven", "isg@hastane.local", Role::IsgEgitmeni),
    ("Selin Kalite", "kalite@hastane.local", Role::KaliteEgitmeni),
    ("Sistem Yöneticisi", "admin@hastane.local", Role::Admin),
];

/// Training units with the 1-based index of their contact in [`STAFF`].
pub(super) const UNITS: [(&str, usize); 2] = [
    ("İSG (İş Sağlığı Güvenliği)", 9),
    ("Kalite", 10),
];
