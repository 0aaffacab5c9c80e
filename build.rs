fn main() {
    // ESP-IDF link arguments are only needed for the firmware target;
    // host builds (tests, simulation) skip them.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
