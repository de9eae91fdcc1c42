fn main() -> std::process::ExitCode {
    server::launch(configs::Service::Tracks)
}
