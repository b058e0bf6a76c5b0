fn main() {
    nozzle_finder::cli::run();
}
